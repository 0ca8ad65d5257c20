mod common;
mod normalizer;
mod routing;
mod service;
