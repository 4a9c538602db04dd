mod config;
mod organize;
mod session;
