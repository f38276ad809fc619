// Interface adapters: wire protocol, network handling and recordings.

pub mod http;
pub mod net;
pub mod protocol;
pub mod replay;
pub mod state;
pub mod utils;
