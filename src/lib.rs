pub mod component;
pub mod elements;
pub mod eli;
pub mod kernel;
pub mod link;
pub mod params;
pub mod sim;
pub mod time;

#[cfg(test)]
mod test;
