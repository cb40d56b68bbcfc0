pub mod call_context;
pub mod services;

pub use call_context::CallContext;
