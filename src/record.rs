use serde::{Deserialize, Serialize};

/// Missing-value sentinel, distinct from the empty string so downstream
/// consumers can tell "field absent" from "field empty on the page".
pub const NA: &str = "NA";

fn na() -> String {
    NA.to_string()
}

/// One search-result entry before detail enrichment.
///
/// Field order is the output column order. Every field is either a
/// non-empty string or exactly [`NA`]; records are built field by field
/// during one enumeration pass and never mutated after collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub name: String,
    pub rating: String,
    pub reviews: String,
    pub phone_number: String,
    pub address: String,
    pub website: String,
    pub google_map_link: String,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            name: na(),
            rating: na(),
            reviews: na(),
            phone_number: na(),
            address: na(),
            website: na(),
            google_map_link: na(),
        }
    }
}

/// Opening hours keyed by the seven canonical weekdays.
///
/// Always carries exactly these keys, each defaulted to [`NA`]; partial
/// extraction only overwrites the days actually found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    #[serde(rename = "Monday")]
    pub monday: String,
    #[serde(rename = "Tuesday")]
    pub tuesday: String,
    #[serde(rename = "Wednesday")]
    pub wednesday: String,
    #[serde(rename = "Thursday")]
    pub thursday: String,
    #[serde(rename = "Friday")]
    pub friday: String,
    #[serde(rename = "Saturday")]
    pub saturday: String,
    #[serde(rename = "Sunday")]
    pub sunday: String,
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self {
            monday: na(),
            tuesday: na(),
            wednesday: na(),
            thursday: na(),
            friday: na(),
            saturday: na(),
            sunday: na(),
        }
    }
}

impl WeeklyHours {
    /// Overwrite the day named by `label` (case-insensitive). Returns
    /// `false` for labels that are not one of the seven canonical days,
    /// which keeps the key set fixed no matter what the page serves.
    pub fn set(&mut self, label: &str, value: String) -> bool {
        let slot = match label.trim().to_ascii_lowercase().as_str() {
            "monday" => &mut self.monday,
            "tuesday" => &mut self.tuesday,
            "wednesday" => &mut self.wednesday,
            "thursday" => &mut self.thursday,
            "friday" => &mut self.friday,
            "saturday" => &mut self.saturday,
            "sunday" => &mut self.sunday,
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        match label.trim().to_ascii_lowercase().as_str() {
            "monday" => Some(&self.monday),
            "tuesday" => Some(&self.tuesday),
            "wednesday" => Some(&self.wednesday),
            "thursday" => Some(&self.thursday),
            "friday" => Some(&self.friday),
            "saturday" => Some(&self.saturday),
            "sunday" => Some(&self.sunday),
            _ => None,
        }
    }
}

/// Secondary attributes extracted from one listing's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub name: String,
    pub rating: String,
    pub reviews_count: String,
    pub address: String,
    pub contact: String,
    pub website: String,
    pub booking_link: String,
    pub hours: WeeklyHours,
}

impl Default for DetailRecord {
    fn default() -> Self {
        Self {
            name: na(),
            rating: na(),
            reviews_count: na(),
            address: na(),
            contact: na(),
            website: na(),
            booking_link: na(),
            hours: WeeklyHours::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_record_defaults_to_sentinel() {
        let record = ListingRecord::default();
        assert_eq!(record.name, NA);
        assert_eq!(record.google_map_link, NA);
    }

    #[test]
    fn records_do_not_share_defaults() {
        let mut a = ListingRecord::default();
        let b = ListingRecord::default();
        a.name = "Acme Travel".to_string();
        assert_eq!(b.name, NA);
    }

    #[test]
    fn weekly_hours_sets_canonical_days_only() {
        let mut hours = WeeklyHours::default();
        assert!(hours.set("Monday", "9 am - 5 pm".to_string()));
        assert!(hours.set("sunday", "Closed".to_string()));
        assert!(!hours.set("Holidays", "Closed".to_string()));
        assert_eq!(hours.monday, "9 am - 5 pm");
        assert_eq!(hours.sunday, "Closed");
        assert_eq!(hours.tuesday, NA);
    }

    #[test]
    fn weekly_hours_lookup_matches_set() {
        let mut hours = WeeklyHours::default();
        hours.set("Friday", "10 am - 4 pm".to_string());
        assert_eq!(hours.get("friday"), Some("10 am - 4 pm"));
        assert_eq!(hours.get("someday"), None);
    }
}
