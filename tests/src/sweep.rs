mod cancellation;
mod dirs;
mod ports;
