mod validator;

use crate::config::RunConfig;
use crate::error::ValidationError;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_config(self)
    }
}

pub fn validate_config(cfg: &RunConfig) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_config(cfg);
    v.finish()
}
