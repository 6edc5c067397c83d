// Worksheet naming under Excel's constraints (31 chars, restricted
// character set), with domain abbreviations to keep names readable.

use std::collections::HashSet;

/// Excel's sheet name limit.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in sheet names, plus separators we strip so
/// office/title pairs compact into one token.
const INVALID_CHARS: &[char] = &['_', '-', ',', '\\', '/', '*', '[', ']', ':', '?', ' '];

/// Common job title and office words, shortened so combined names fit
/// into 31 characters.
fn abbreviate(word: &str) -> &str {
    match word {
        "Manager" | "manager" | "Manger" => "Mgr",
        "Associate" => "Assoc",
        "I" => "1",
        "II" => "2",
        "III" => "3",
        "InformationTechnology" => "IT",
        "Technician" => "Tech",
        "Mechanical" => "Mech",
        "Certification" => "Cert",
        "Senior" => "Sr.",
        "HumanResources" | "HumanResouce" => "HR",
        "BuisinessPartner" => "BP",
        "President" => "Pres",
        "Engineer" | "Engineering" => "Eng",
        "Operations" => "Op",
        "MANKATO" => "MKTO",
        "LEXINGTON" => "LEX",
        "REYNOSA" => "REY",
        "Electronic" => "Elec",
        "Component" => "Comp",
        "Assembler" => "Assem",
        "Marketing" => "MkTg",
        "Maintenance" => "Maint.",
        "And" | "and" => "&",
        "General" => "Gen",
        "Network" => "Net",
        "Infrastructure" => "Inf",
        "Specialist" => "Spclst",
        "Environmental" => "Enviro",
        "Health" => "Hlth",
        "Safety" => "Sfty",
        "Director" => "Dir",
        "Administrative" | "Administrator" => "Admin",
        "Product" => "Prod",
        "Accounts" => "Accts",
        "Aftermarket" => "AM",
        "Remanufacturing" => "Reman",
        "Supervisor" => "Suprvsr.",
        "Development" => "Dev",
        "Caterpillar" => "CAT",
        "Communications" => "Comms",
        "Logistics" => "Log",
        "Compliance" => "Cmpl",
        "Shipping" => "Ship",
        "Recieving" => "Rec",
        "Technical" => "Tech",
        "Fabrication" => "Fab",
        "Manufacturing" => "Man.",
        "Represenative" => "Rep",
        other => other,
    }
}

/// Sanitize one name component: abbreviate known words, drop characters
/// Excel rejects, and truncate to the 31-char limit. An empty result
/// becomes "Unnamed".
pub fn sanitize(name: &str) -> String {
    let abbreviated: String = name
        .split_whitespace()
        .map(abbreviate)
        .collect::<Vec<_>>()
        .join(" ");

    let cleaned: String = abbreviated
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .collect();

    if cleaned.is_empty() {
        return "Unnamed".to_string();
    }
    cleaned.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Sheet name for an (office, job title) breakdown: both components
/// sanitized, joined with a hyphen, truncated to the limit.
pub fn breakdown_sheet_name(office: &str, job_title: &str) -> String {
    let combined = format!("{}-{}", sanitize(office), sanitize(job_title));
    combined.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Deduplicate against names already used in the workbook by appending
/// a numeric suffix, trimming the base so the result stays legal.
pub fn unique_name(used: &mut HashSet<String>, name: String) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    for n in 2u32.. {
        let suffix = format!("{n}");
        let keep = MAX_SHEET_NAME_LEN - suffix.len();
        let candidate: String = name.chars().take(keep).chain(suffix.chars()).collect();
        if used.insert(candidate.clone()) {
            return candidate;
        }
    }
    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_title_words() {
        assert_eq!(sanitize("Senior Manager"), "Sr.Mgr");
        assert_eq!(sanitize("Maintenance Technician II"), "Maint.Tech2");
    }

    #[test]
    fn abbreviates_office_words() {
        assert_eq!(sanitize("EPG REYNOSA"), "EPGREY");
        assert_eq!(sanitize("EPG MANKATO"), "EPGMKTO");
    }

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(sanitize("Shipping/Receiving [Dock]"), "ShipReceivingDock");
        assert_eq!(sanitize("Admin_Assistant - Plant"), "AdminAssistantPlant");
    }

    #[test]
    fn empty_becomes_unnamed() {
        assert_eq!(sanitize(""), "Unnamed");
        assert_eq!(sanitize("- _ ?"), "Unnamed");
    }

    #[test]
    fn truncates_to_limit() {
        let long = "Extraordinarily Long Job Title That Keeps Going";
        assert_eq!(sanitize(long).chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn breakdown_name_combines_office_and_title() {
        assert_eq!(
            breakdown_sheet_name("EPG MANKATO", "Senior Engineer"),
            "EPGMKTO-Sr.Eng"
        );
        assert!(
            breakdown_sheet_name("EPG LEXINGTON", "Environmental Health and Safety Specialist")
                .chars()
                .count()
                <= MAX_SHEET_NAME_LEN
        );
    }

    #[test]
    fn unique_names_get_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_name(&mut used, "EPGREY-Tech".into()), "EPGREY-Tech");
        assert_eq!(unique_name(&mut used, "EPGREY-Tech".into()), "EPGREY-Tech2");
        assert_eq!(unique_name(&mut used, "EPGREY-Tech".into()), "EPGREY-Tech3");
    }

    #[test]
    fn unique_name_respects_length_limit() {
        let mut used = HashSet::new();
        let base = "A".repeat(MAX_SHEET_NAME_LEN);
        assert_eq!(unique_name(&mut used, base.clone()), base);
        let second = unique_name(&mut used, base);
        assert_eq!(second.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(second.ends_with('2'));
    }
}
