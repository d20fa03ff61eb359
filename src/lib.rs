pub mod error;

pub mod service {
    pub mod browser;
    pub mod command;
    pub mod config_service;
    pub mod convert_client;
    pub mod frontend;
    pub mod health;
    pub mod process;
    pub mod runtime;

    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod action {
    pub mod cli;
    pub mod convert;
}

pub mod facade {
    pub mod bootstrap_facade;

    pub mod traits {
        pub mod i_bootstrap;
    }
}

pub mod models {
    pub mod command;
    pub mod conversion;
    pub mod environment;
    pub mod state;
}

pub mod utils {
    pub mod file;
    pub mod manifest;
    pub mod utils;
    pub mod zip;
}
