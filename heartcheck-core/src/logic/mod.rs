pub mod credentials;
pub mod features;
pub mod history;
pub mod model;
pub mod report;
pub mod session;
pub mod tabular;
