mod token;

pub use token::resolve_token;
