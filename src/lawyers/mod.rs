//! Static lawyer directory and search
//!
//! The directory is fixed demo data. Each entry carries a portrait prompt that
//! the CLI can feed to an [`ImageAcquirer`](crate::imaging::ImageAcquirer).

use crate::types::{AppError, Result};
use serde::Serialize;

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lawyer {
    pub id: &'static str,
    pub name: &'static str,
    pub specialization: &'static str,
    pub location: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub rating: f32,
    pub firm: &'static str,
    pub experience_years: u8,
    /// Description used to generate the portrait.
    pub portrait_prompt: &'static str,
}

/// Specializations offered in the search form.
pub const SPECIALIZATIONS: [&str; 9] = [
    "Civil Law",
    "Criminal Law",
    "Family Law",
    "Corporate Law",
    "Property Law",
    "Cyber Law",
    "Intellectual Property",
    "Tax Law",
    "Labor Law",
];

macro_rules! lawyer {
    ($id:expr, $name:expr, $spec:expr, $loc:expr, $phone:expr, $email:expr, $rating:expr, $firm:expr, $exp:expr, $prompt:expr) => {
        Lawyer {
            id: $id,
            name: $name,
            specialization: $spec,
            location: $loc,
            phone: $phone,
            email: $email,
            rating: $rating,
            firm: $firm,
            experience_years: $exp,
            portrait_prompt: $prompt,
        }
    };
}

/// The full directory.
pub fn directory() -> Vec<Lawyer> {
    vec![
        lawyer!("1", "Adv. Priya Sharma", "Criminal Law", "Delhi, India", "+91 98765 43210", "priya.sharma@example.com", 4.8, "Sharma & Associates", 12, "professional indian woman lawyer portrait"),
        lawyer!("2", "Adv. Rohan Mehta", "Corporate Law", "Mumbai, India", "+91 91234 56789", "rohan.mehta@example.com", 4.5, "Mehta Legal Solutions", 8, "professional indian man lawyer portrait"),
        lawyer!("3", "Adv. Anjali Singh", "Family Law", "Bangalore, India", "+91 87654 32109", "anjali.singh@example.com", 4.7, "Singh & Partners", 10, "elegant indian female attorney"),
        lawyer!("4", "Adv. Vikram Rao", "Property Law", "Chennai, India", "+91 70123 45678", "vikram.rao@example.com", 4.6, "Rao Property Chambers", 15, "experienced male lawyer india"),
        lawyer!("5", "Adv. Sunita Reddy", "Cyber Law", "Hyderabad, India", "+91 63098 76543", "sunita.reddy@example.com", 4.9, "Reddy Tech Legal", 7, "modern indian woman tech lawyer"),
        lawyer!("6", "Adv. Alok Verma", "Civil Law", "Kolkata, India", "+91 88877 55544", "alok.verma@example.com", 4.3, "Verma Civil Litigators", 9, "indian man lawyer in suit"),
        lawyer!("7", "Adv. Sneha Das", "Intellectual Property", "Kolkata, India", "+91 99887 76655", "sneha.das@example.com", 4.6, "Das IP Experts", 8, "creative indian woman lawyer"),
        lawyer!("8", "Adv. Arjun Kapoor", "Tax Law", "Mumbai, India", "+91 77665 54433", "arjun.kapoor@example.com", 4.4, "Kapoor Tax Advisors", 11, "sharp indian man tax lawyer"),
        lawyer!("9", "Adv. Meera Iyer", "Labor Law", "Delhi, India", "+91 66554 43322", "meera.iyer@example.com", 4.7, "Iyer Employment Law", 9, "confident south indian woman lawyer"),
        lawyer!("10", "Adv. Rahul Nair", "Criminal Law", "Hyderabad, India", "+91 55443 32211", "rahul.nair@example.com", 4.5, "Nair Defense Firm", 10, "serious indian man criminal lawyer"),
        lawyer!("11", "Adv. Diya Reddy", "Corporate Law", "Bangalore, India", "+91 44332 21100", "diya.reddy@example.com", 4.8, "Reddy Corp Legal", 13, "professional young indian woman corporate lawyer"),
        lawyer!("12", "Adv. Karan Joshi", "Property Law", "Pune, India", "+91 33221 10099", "karan.joshi@example.com", 4.6, "Joshi Real Estate Law", 14, "smart indian man property lawyer"),
        lawyer!("13", "Adv. Fatima Khan", "Family Law", "Pune, India", "+91 22110 09988", "fatima.khan@example.com", 4.9, "Khan Family Advocates", 7, "empathetic indian woman family lawyer"),
    ]
}

/// Search criteria. At least one must be set.
#[derive(Debug, Clone, Default)]
pub struct LawyerQuery {
    pub location: Option<String>,
    pub specialization: Option<String>,
}

/// Filter the directory.
///
/// Location matches as a case-insensitive substring; specialization must be
/// one of [`SPECIALIZATIONS`] and matches exactly.
pub fn search(query: &LawyerQuery) -> Result<Vec<Lawyer>> {
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase);
    let specialization = query
        .specialization
        .as_deref()
        .filter(|s| !s.is_empty());

    if location.is_none() && specialization.is_none() {
        return Err(AppError::InvalidInput(
            "Please enter location or select a specialization.".to_string(),
        ));
    }

    if let Some(spec) = specialization {
        if !SPECIALIZATIONS.contains(&spec) {
            return Err(AppError::InvalidInput(format!(
                "Unknown specialization '{}'. Choose one of: {}",
                spec,
                SPECIALIZATIONS.join(", ")
            )));
        }
    }

    Ok(directory()
        .into_iter()
        .filter(|lawyer| {
            location
                .as_deref()
                .map_or(true, |loc| lawyer.location.to_lowercase().contains(loc))
        })
        .filter(|lawyer| specialization.map_or(true, |spec| lawyer.specialization == spec))
        .collect())
}
