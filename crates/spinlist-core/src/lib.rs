pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;
pub mod slugs;

#[cfg(test)]
mod testing;

pub use errors::CoreError;
