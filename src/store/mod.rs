mod store;

pub use store::SubdivisionStore;
