pub mod urlshortener {
    pub mod v1 {
        tonic::include_proto!("urlshortener.v1");
    }
}

pub mod v1 {
    pub use crate::urlshortener::v1::*;
}
