pub mod dto;
pub mod guards;
pub mod ports;
