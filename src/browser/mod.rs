pub mod launcher;
pub mod session;

pub use session::BrowserSession;
