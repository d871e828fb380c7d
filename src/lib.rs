pub mod data {
    pub mod datasources {
        pub mod attribute_encoder_datasource;
        pub mod envelope_signer_datasource;
        mod utils;
    }
    pub(crate) mod models {
        pub(crate) mod app_store_receipt {
            pub(crate) mod common;
            pub(crate) mod in_app_model;
            pub(crate) mod receipt_model;
        }
    }
    pub mod repositories {
        pub mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod purchase_item;
        pub mod receipt_record;
        pub mod signing_credentials;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod config;
pub mod errors;
pub mod server;
pub mod util;
