use clap::Parser;
use fifo_memory_sim::config::Config;
use fifo_memory_sim::run_simulation;
use std::process;

fn init_msg() {
    println!("fifo virtual memory simulation");
}

fn main() {
    env_logger::init();
    init_msg();
    let config = Config::parse();
    config.display();
    println!();
    if let Err(err) = run_simulation(config) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
