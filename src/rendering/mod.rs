pub mod template;
pub mod viewport;
