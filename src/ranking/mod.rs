pub mod lexical;
pub mod normalize;
pub mod refiner;
pub mod scorer;
pub mod selector;
pub mod signals;
pub mod weights;
