pub mod company_handlers;
pub mod contact_handlers;
pub mod duplicate_handlers;
pub mod guest_handlers;
pub mod link_handlers;
pub mod message_handlers;
pub mod system_handlers;

pub use company_handlers::*;
pub use contact_handlers::*;
pub use duplicate_handlers::*;
pub use guest_handlers::*;
pub use link_handlers::*;
pub use message_handlers::*;
pub use system_handlers::*;
