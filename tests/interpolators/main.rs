extern crate nyx_interp as nyx;
extern crate pretty_env_logger;

mod hermite;
mod lagrange;
mod splines;

pub(crate) fn init_logger() {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }
}
