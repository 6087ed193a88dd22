pub mod config;
pub mod error;
pub mod player;
pub mod timeline;
pub mod trace;

#[cfg(test)]
mod test;
