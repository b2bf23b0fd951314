//! TCP listener for single-connection serving.
//!
//! Binds to a random port, then accepts and services one connection at a
//! time until a handler asks the server to quit.

use crate::logger::{Logger, LEVEL_NORMAL, LEVEL_VERBOSE};
use crate::runtime::{ConnectionHandler, Directive};
use rand::Rng;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener};
use std::ops::RangeInclusive;

/// Ports the listener draws from.
pub const PORT_RANGE: RangeInclusive<u16> = 1024..=11023;

/// Pending connections the kernel may queue.
pub const LISTEN_BACKLOG: i32 = 1;

/// Fatal server errors. Each one ends the process.
#[derive(Debug)]
pub enum ServerError {
    Socket(io::Error),
    Bind { port: u16, source: io::Error },
    Listen(io::Error),
    Accept(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Socket(e) => write!(f, "Failed to open socket: {e}"),
            ServerError::Bind { port, source } => {
                write!(f, "Failed to bind socket to port {port}: {source}")
            }
            ServerError::Listen(e) => write!(f, "Failed to listen: {e}"),
            ServerError::Accept(e) => write!(f, "Error with accept: {e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Socket(e) | ServerError::Listen(e) | ServerError::Accept(e) => Some(e),
            ServerError::Bind { source, .. } => Some(source),
        }
    }
}

/// Listening socket, owned for the lifetime of the server.
pub struct Listener {
    socket: Socket,
    logger: Logger,
    port: Option<u16>,
}

impl Listener {
    /// Open an IPv4 TCP socket. Nothing is bound yet.
    pub fn new(logger: Logger) -> Result<Self, ServerError> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(ServerError::Socket)?;
        logger.info(LEVEL_VERBOSE, format_args!("Opened listening socket"));

        Ok(Self {
            socket,
            logger,
            port: None,
        })
    }

    /// Port bound by `bind`, if it has run.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Bind to a random port in `PORT_RANGE` on all interfaces.
    pub fn bind(&mut self) -> Result<u16, ServerError> {
        self.bind_with(&mut rand::thread_rng())
    }

    /// `bind` with the port source supplied by the caller.
    pub fn bind_with<R: Rng>(&mut self, rng: &mut R) -> Result<u16, ServerError> {
        let socket = &self.socket;
        let port = bind_random_port(rng, &self.logger, |port| {
            let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
            socket.bind(&SockAddr::from(addr))
        })?;

        self.logger
            .info(LEVEL_NORMAL, format_args!("Using port {}", port));
        self.port = Some(port);
        Ok(port)
    }

    /// Listen and service connections one at a time until a handler
    /// returns `Directive::Quit`.
    pub fn serve<H: ConnectionHandler>(self, handler: &H) -> Result<(), ServerError> {
        self.logger.info(
            LEVEL_VERBOSE,
            format_args!("Calling listen with backlog {}", LISTEN_BACKLOG),
        );
        self.socket
            .listen(LISTEN_BACKLOG)
            .map_err(ServerError::Listen)?;

        let listener: TcpListener = self.socket.into();
        serve_connections(&listener, handler, &self.logger)
    }
}

/// Try random ports from `PORT_RANGE` until `try_bind` succeeds.
///
/// Address-in-use draws a new port; any other error is fatal.
pub fn bind_random_port<R, F>(
    rng: &mut R,
    logger: &Logger,
    mut try_bind: F,
) -> Result<u16, ServerError>
where
    R: Rng,
    F: FnMut(u16) -> io::Result<()>,
{
    loop {
        let port = rng.gen_range(PORT_RANGE);
        logger.info(LEVEL_VERBOSE, format_args!("Calling bind on port {}", port));

        match try_bind(port) {
            Ok(()) => return Ok(port),
            Err(ref e) if e.kind() == io::ErrorKind::AddrInUse => {
                logger.info(
                    LEVEL_VERBOSE,
                    format_args!("Port {} in use, drawing another", port),
                );
            }
            Err(source) => return Err(ServerError::Bind { port, source }),
        }
    }
}

/// Accept loop: one connection at a time, each dropped (closed) after its
/// handler returns.
pub fn serve_connections<H: ConnectionHandler>(
    listener: &TcpListener,
    handler: &H,
    logger: &Logger,
) -> Result<(), ServerError> {
    loop {
        logger.info(LEVEL_VERBOSE, format_args!("Calling accept"));
        let (mut stream, peer) = listener.accept().map_err(ServerError::Accept)?;
        logger.info(
            LEVEL_VERBOSE,
            format_args!("We have received a connection from {}", peer),
        );

        let directive = handler.handle(&mut stream);
        drop(stream);

        if directive == Directive::Quit {
            logger.info(LEVEL_VERBOSE, format_args!("Stopping listener"));
            return Ok(());
        }
    }
}

/// Address clients use to reach a listener bound on all interfaces.
pub fn local_addr(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}
