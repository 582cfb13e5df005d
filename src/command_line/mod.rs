#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

pub(crate) mod cli;
