// Interface adapters: protocol, HTTP/WS handlers and the broadcast-backed ports.

pub mod http;
pub mod net;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod surface;
pub mod utils;
