mod property_ref;

pub use property_ref::PropertyRef;
