use std::fmt;

use super::name::{color_from_string, initials, ColorMode, HslColor};
use super::user::UserRecord;

/// Everything the detail panel shows for a committed selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDetails {
    pub heading: String,
    pub initials: String,
    pub avatar_color: HslColor,
    pub fields: Vec<(&'static str, String)>,
    pub user_id: u64,
}

impl ProfileDetails {
    pub fn new(user: &UserRecord, mode: ColorMode) -> Self {
        let address = &user.address;
        let mut fields = vec![
            ("Username", user.username.clone()),
            ("Email", user.email.clone()),
            ("Phone", user.phone.clone()),
            ("Website", user.website.clone()),
            ("Company", user.company.name.clone()),
            ("Catchphrase", user.company.catch_phrase.clone()),
            ("Address", join_present(&[address.street.as_str(), address.suite.as_str()])),
            ("City", join_present(&[address.city.as_str(), address.zipcode.as_str()])),
        ];
        if !address.geo.lat.is_empty() || !address.geo.lng.is_empty() {
            fields.push(("Geo", format!("{}, {}", address.geo.lat, address.geo.lng)));
        }
        fields.retain(|(_, value)| !value.is_empty());

        Self {
            heading: user.display_name(),
            initials: initials(&user.name),
            avatar_color: color_from_string(&user.name, mode),
            fields,
            user_id: user.id,
        }
    }
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ProfileDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.heading, self.initials)?;
        for (label, value) in &self.fields {
            writeln!(f, "  {label}: {value}")?;
        }
        write!(f, "  User ID: {}", self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Geo};

    #[test]
    fn test_profile_lists_present_fields_only() {
        let mut user = UserRecord::new(4, "Patricia Lebsack")
            .with_email("Julianne.OConner@kory.org")
            .with_company("Robel-Corkery");
        user.address = Address {
            street: "Hoeger Mall".into(),
            suite: "Apt. 692".into(),
            city: "South Elvis".into(),
            zipcode: String::new(),
            geo: Geo::default(),
        };

        let profile = ProfileDetails::new(&user, ColorMode::Light);

        assert_eq!(profile.heading, "Lebsack, Patricia");
        assert_eq!(profile.initials, "PL");
        assert_eq!(
            profile.fields,
            vec![
                ("Email", "Julianne.OConner@kory.org".to_string()),
                ("Company", "Robel-Corkery".to_string()),
                ("Address", "Hoeger Mall, Apt. 692".to_string()),
                ("City", "South Elvis".to_string()),
            ]
        );
        assert!(profile.to_string().ends_with("User ID: 4"));
    }
}
