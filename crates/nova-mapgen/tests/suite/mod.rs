mod annotations;
mod options;
mod processor;
mod resolution;
mod wrappers;
