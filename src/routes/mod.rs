pub mod gradebook;

pub use gradebook::configure_gradebook_routes;
