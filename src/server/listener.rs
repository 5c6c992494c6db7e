// Reusable listener module
// Binds the application port with SO_REUSEADDR/SO_REUSEPORT set

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Listen backlog passed to `listen(2)`
const BACKLOG: i32 = 128;

/// Create a non-blocking `TcpListener` bound to `addr`.
///
/// Address reuse lets the server come straight back up on a port whose
/// previous sockets are still in `TIME_WAIT`.
pub fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
