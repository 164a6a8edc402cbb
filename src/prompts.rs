//! Prompt construction for the four content kinds.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the reply-shape contract (heading
//!    markers, pipe-delimited columns, HTML fragment tags) lives in
//!    exactly one place, next to the parser that depends on it.
//!
//! 2. **Testability** — unit tests can assert that every record field a
//!    prompt references actually appears in the built string, without
//!    calling a live model.
//!
//! Prompt construction is pure string formatting: no validation, no
//! networking, and it cannot fail.

use crate::states::{ContentKind, JurisdictionRecord};

/// Which reply shape the prompts request, matching the assembler variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Headed prose with `#` markers; tables as pipe-delimited rows.
    Markdown,
    /// HTML fragments with `<thead>`/`<tbody>` table markup.
    Html,
}

/// Pipe-delimited column header requested for the rate schedule.
pub const RATES_COLUMNS: &str =
    "Service Type | Base Rate | Mileage Rate | Wait Time Rate | After Hours | Weekend/Holiday";

/// Pipe-delimited column header requested for the service area table.
pub const SERVICE_AREAS_COLUMNS: &str = "Service Zone | Counties Covered | Response Time | \
     Population Served | Facilities Covered | Special Conditions";

/// Pipe-delimited column header requested for the performance table.
pub const PERFORMANCE_COLUMNS: &str = "Performance Category | Standard | Measurement Method | \
     Minimum Target | Penalty for Non-Compliance";

/// Build the instruction string for one content kind.
pub fn build(kind: ContentKind, variant: PromptVariant, record: &JurisdictionRecord) -> String {
    match kind {
        ContentKind::Contract => contract_prompt(variant, record),
        ContentKind::Rates => rates_prompt(variant, record),
        ContentKind::ServiceAreas => service_areas_prompt(variant, record),
        ContentKind::Performance => performance_prompt(variant, record),
    }
}

fn contract_prompt(variant: PromptVariant, r: &JurisdictionRecord) -> String {
    let mut p = String::with_capacity(1024);
    p.push_str(&format!(
        "Generate a detailed transportation services contract between the {} \
         (located in {}, {}) and {} (a transportation provider headquartered in {}, {}).\n\n",
        r.agency.name, r.agency.city, r.state, r.provider.name, r.provider.city, r.state
    ));
    p.push_str("Use these specific details:\n");
    p.push_str(&format!("- Contract date: {}\n", r.contract_date));
    p.push_str(&format!("- Term: {}\n", r.details.term));
    p.push_str(&format!("- Service area: {}\n", r.regions_joined()));
    p.push_str("- Provider details:\n");
    p.push_str(&format!(
        "    * Fleet size: {} vehicles\n",
        r.details.fleet_size
    ));
    p.push_str(&format!(
        "    * Operating hours: {}\n",
        r.details.operating_hours
    ));
    p.push_str(&format!(
        "    * Number of certified drivers: {}\n\n",
        r.details.driver_count
    ));
    push_contract_sections(&mut p);
    match variant {
        PromptVariant::Markdown => p.push_str(
            "\nFormat the response so it can be parsed into sections, with clear headings \
             marked by '#' symbols ('#' for the title, '##' for sections, '###' for \
             subsections).\n",
        ),
        PromptVariant::Html => p.push_str(
            "\nFormat the response as clean HTML with proper heading tags and paragraphs; \
             return only the body fragment, no <html> or <head> wrapper.\n",
        ),
    }
    p.push_str(&format!(
        "Make all details specific to {} and medical transportation.",
        r.state
    ));
    p
}

fn push_contract_sections(p: &mut String) {
    p.push_str("Include these standard sections:\n");
    for (i, section) in [
        "Parties and Purpose",
        "Definitions",
        "Term and Renewal",
        "Scope of Services",
        "Provider Responsibilities",
        "Agency Responsibilities",
        "Compensation",
        "Compliance and Reporting",
        "Insurance and Liability",
        "Termination",
        "General Provisions",
    ]
    .iter()
    .enumerate()
    {
        p.push_str(&format!("{}. {}\n", i + 1, section));
    }
}

fn rates_prompt(variant: PromptVariant, r: &JurisdictionRecord) -> String {
    let mut p = String::with_capacity(1024);
    p.push_str(&format!(
        "Generate a detailed transportation rate schedule for the {} contract with {} in {}.\n\n",
        r.agency.name, r.provider.name, r.state
    ));
    push_table_shape(&mut p, variant, RATES_COLUMNS);
    p.push_str("\nInclude these service types:\n");
    for service in [
        "Standard Vehicle Transport",
        "Wheelchair Accessible Vehicle",
        "Stretcher Transport",
        "Bariatric Transport",
        "Group Transport",
    ] {
        p.push_str(&format!("- {}\n", service));
    }
    p.push_str(&format!(
        "\nConsider {}'s:\n- Cost of living\n- Fuel costs\n- Urban vs rural rates\n\
         - State regulations\n\nMake rates realistic for the {} market.",
        r.state, r.state
    ));
    p
}

fn service_areas_prompt(variant: PromptVariant, r: &JurisdictionRecord) -> String {
    let mut p = String::with_capacity(1024);
    p.push_str(&format!(
        "Generate a detailed service area coverage table for {}'s contract in {}.\n\n",
        r.provider.name, r.state
    ));
    push_table_shape(&mut p, variant, SERVICE_AREAS_COLUMNS);
    p.push_str("\nCreate entries for:\n");
    for zone in [
        "Primary urban zones",
        "Suburban areas",
        "Rural coverage",
        "Special service areas",
    ] {
        p.push_str(&format!("- {}\n", zone));
    }
    p.push_str(&format!(
        "\nConsider {}'s:\n- Geographic features\n- Population distribution\n\
         - Healthcare facility locations\n- Emergency service requirements",
        r.state
    ));
    p
}

fn performance_prompt(variant: PromptVariant, r: &JurisdictionRecord) -> String {
    let mut p = String::with_capacity(1024);
    p.push_str(&format!(
        "Generate detailed performance standards for {}'s contract in {}.\n\n",
        r.provider.name, r.state
    ));
    push_table_shape(&mut p, variant, PERFORMANCE_COLUMNS);
    p.push_str("\nInclude standards for:\n");
    for category in [
        "On-time performance",
        "Vehicle maintenance",
        "Driver qualifications",
        "Customer service",
        "Safety metrics",
        "Complaint resolution",
    ] {
        p.push_str(&format!("- {}\n", category));
    }
    p.push_str(&format!(
        "\nConsider {}'s:\n- Healthcare regulations\n- Quality metrics\n\
         - Reporting requirements",
        r.state
    ));
    p
}

/// State the desired table reply shape for the given variant.
fn push_table_shape(p: &mut String, variant: PromptVariant, columns: &str) {
    match variant {
        PromptVariant::Markdown => {
            p.push_str(
                "The response must be pipe-separated values, one row per line, with no \
                 markdown separator row, using exactly these columns:\n\n",
            );
            p.push_str(columns);
            p.push('\n');
        }
        PromptVariant::Html => {
            p.push_str(
                "Return a properly formatted HTML table with <thead> and <tbody> tags and \
                 no surrounding prose, using exactly these columns:\n\n",
            );
            p.push_str(columns);
            p.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;

    fn florida() -> JurisdictionRecord {
        states::builtin()
            .iter()
            .find(|s| s.abbrev == "FL")
            .unwrap()
            .clone()
    }

    /// Every record field a prompt references must appear verbatim.
    #[test]
    fn contract_prompt_embeds_every_field() {
        let r = florida();
        let p = build(ContentKind::Contract, PromptVariant::Markdown, &r);
        for expected in [
            "Florida",
            "Florida Department of Health",
            "Tallahassee",
            "SafeRide Transit Solutions",
            "Orlando",
            "March 15, 2024",
            "2-year contract with 1-year renewal option",
            "Orange County, Seminole County, Osceola County",
            "50 vehicles",
            "24/7",
            "120",
        ] {
            assert!(p.contains(expected), "missing '{expected}' in:\n{p}");
        }
    }

    #[test]
    fn table_prompts_name_their_columns() {
        let r = florida();
        let rates = build(ContentKind::Rates, PromptVariant::Markdown, &r);
        assert!(rates.contains(RATES_COLUMNS));
        let areas = build(ContentKind::ServiceAreas, PromptVariant::Markdown, &r);
        assert!(areas.contains(SERVICE_AREAS_COLUMNS));
        let perf = build(ContentKind::Performance, PromptVariant::Markdown, &r);
        assert!(perf.contains(PERFORMANCE_COLUMNS));
    }

    #[test]
    fn markdown_variant_requests_heading_markers() {
        let p = build(ContentKind::Contract, PromptVariant::Markdown, &florida());
        assert!(p.contains("'#'"));
        assert!(!p.contains("<thead>"));
    }

    #[test]
    fn html_variant_requests_table_markup() {
        let p = build(ContentKind::Rates, PromptVariant::Html, &florida());
        assert!(p.contains("<thead>"));
        assert!(!p.contains("pipe-separated"));
    }

    #[test]
    fn prompts_localise_to_the_jurisdiction() {
        let r = florida();
        for kind in ContentKind::ALL {
            let p = build(kind, PromptVariant::Markdown, &r);
            assert!(p.contains("Florida"), "{kind} prompt not localised");
        }
    }
}
