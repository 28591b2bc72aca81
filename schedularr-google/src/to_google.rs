use chrono::{DateTime, Utc};
use schedularr_core::booking::Booking;

use crate::types::{EventBody, EventDateTime};

pub trait ToGoogle {
    fn to_google(&self) -> EventBody;
}

impl ToGoogle for Booking {
    fn to_google(&self) -> EventBody {
        EventBody {
            summary: self.title.clone(),
            description: Some(self.description()),
            start: utc_to_google(&self.start),
            end: utc_to_google(&self.end),
        }
    }
}

fn utc_to_google(dt: &DateTime<Utc>) -> EventDateTime {
    EventDateTime {
        date_time: dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        time_zone: "UTC".to_string(),
    }
}
