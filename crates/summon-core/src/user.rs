use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::tz_serde;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    phone: String,
    email: String,
    #[serde(with = "tz_serde")]
    timezone: Tz,
    active: bool,
}

impl User {
    pub fn new(name: String, phone: String) -> Self {
        Self {
            id: UserId::new(),
            name,
            phone,
            email: String::new(),
            timezone: Tz::UTC,
            active: true,
        }
    }

    pub fn with_email(mut self, email: String) -> Self {
        self.email = email;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
