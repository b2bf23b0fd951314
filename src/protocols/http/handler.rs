//! HTTP connection handler.

use super::fetch::FileFetcher;
use super::parser::{self, Method};
use super::response::{ContentType, Response, ResponseError};
use super::validator;
use crate::logger::{Logger, LEVEL_VERBOSE};
use crate::runtime::{read_once, write_all_logged, ConnectionHandler, Directive, BUFFER_SIZE};
use std::io::{Read, Write};

/// Serves a single GET per connection, then closes it.
#[derive(Debug, Clone)]
pub struct HttpHandler {
    logger: Logger,
    fetcher: FileFetcher,
}

impl HttpHandler {
    pub fn new(logger: Logger, fetcher: FileFetcher) -> Self {
        Self { logger, fetcher }
    }

    /// Produce the response for one read.
    ///
    /// Client mistakes become 400/404 responses. `Err` is only returned for
    /// internal response-construction failures.
    pub fn respond(&self, input: &[u8]) -> Result<Response, ResponseError> {
        let request = match parser::parse(input) {
            Ok(request) => request,
            Err(e) => {
                self.logger
                    .error(LEVEL_VERBOSE, format_args!("Rejected request: {}", e));
                return Response::bad_request();
            }
        };

        match request.method {
            Method::Get => self.on_get(request.path, request.name_len()),
            Method::Unknown => {
                self.logger.error(
                    LEVEL_VERBOSE,
                    format_args!("Received malformed packet, could not parse method"),
                );
                Response::bad_request()
            }
            method => {
                self.logger.error(
                    LEVEL_VERBOSE,
                    format_args!("{} request not implemented", method.as_str()),
                );
                Response::bad_request()
            }
        }
    }

    fn on_get(&self, path: &[u8], name_len: usize) -> Result<Response, ResponseError> {
        let display = String::from_utf8_lossy(path);

        if !validator::verify(path, name_len) {
            self.logger.error(
                LEVEL_VERBOSE,
                format_args!("Received invalid filename: {}", display),
            );
            return Response::not_found();
        }

        let payload = match self.fetcher.fetch(path) {
            Ok(payload) => payload,
            Err(e) => {
                self.logger.error(
                    LEVEL_VERBOSE,
                    format_args!("Could not read filename {}: {}", display, e),
                );
                return Response::not_found();
            }
        };

        self.logger
            .info(LEVEL_VERBOSE, format_args!("Get {} successful", display));
        Response::ok(&payload, ContentType::for_path(path))
    }
}

impl ConnectionHandler for HttpHandler {
    fn handle<S: Read + Write>(&self, stream: &mut S) -> Directive {
        let mut buffer = [0u8; BUFFER_SIZE];

        let n = match read_once(stream, &mut buffer) {
            Ok(n) => n,
            Err(e) => {
                self.logger
                    .error(LEVEL_VERBOSE, format_args!("Error with read: {}", e));
                return Directive::Close;
            }
        };

        let input = &buffer[..n];
        self.logger.info(
            LEVEL_VERBOSE,
            format_args!("Received {} bytes: {}", n, String::from_utf8_lossy(input)),
        );

        match self.respond(input) {
            Ok(response) => {
                let sent = write_all_logged(stream, response.as_bytes(), &self.logger);
                self.logger.info(
                    LEVEL_VERBOSE,
                    format_args!(
                        "Sent {} response ({} of {} bytes)",
                        response.status().code(),
                        sent,
                        response.len()
                    ),
                );
            }
            Err(e) => {
                self.logger.error(
                    LEVEL_VERBOSE,
                    format_args!("Internal error building response: {}", e),
                );
            }
        }

        Directive::Close
    }
}
