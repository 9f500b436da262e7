pub mod accumulator;
pub mod frame;
pub mod history;
pub mod mapper;
pub mod sampler;
pub mod sensors;
pub mod slice;
pub mod stack;
