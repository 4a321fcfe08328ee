mod determinism;
mod facade;
mod images;
