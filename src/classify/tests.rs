use super::*;

fn classifier() -> ValueClassifier {
    ValueClassifier::new().expect("classifier patterns compile")
}

fn value_of(text: &str) -> Option<f64> {
    classifier().value(&Cell::plain(text))
}

#[test]
fn rule_order_runs_vetoes_before_extractors() {
    assert_eq!(
        RULE_ORDER,
        [
            Rule::LinkVeto,
            Rule::DateVeto,
            Rule::CitationVeto,
            Rule::Measurement,
            Rule::Decimal,
            Rule::Integer,
        ]
    );
}

#[test]
fn measurement_takes_the_first_reading() {
    assert_eq!(value_of("1.46 m (4 ft 9¼ in)"), Some(1.46));
    assert_eq!(value_of("1.62 m (5 ft 3¾ in)"), Some(1.62));
    assert_eq!(value_of("5 ft 2 in"), Some(5.0));
    assert_eq!(value_of("Height: 1.62 meter"), Some(1.62));
}

#[test]
fn bare_numbers_fall_back_to_decimal_then_integer() {
    assert_eq!(value_of("1.524"), Some(1.524));
    assert_eq!(value_of("2014"), Some(2014.0));
    assert_eq!(value_of("approx. 12 people"), Some(12.0));
    assert_eq!(value_of("score 3.5 of 10"), Some(3.5));
}

#[test]
fn linked_cells_are_never_numeric() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify(&Cell::linked("2014")),
        Classification::Rejected(Rejection::Linked)
    );
    assert_eq!(classifier.value(&Cell::linked("2014 NBA draft")), None);
    assert_eq!(classifier.value(&Cell::linked("1.46 m")), None);
}

#[test]
fn link_marker_text_is_not_treated_as_a_link_flag() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify(&Cell::plain("[LINK]2014")),
        Classification::Rejected(Rejection::Citation)
    );
}

#[test]
fn dates_are_vetoed() {
    let classifier = classifier();
    for text in ["20 May 1922", "August 1928", "1922-05-20", "May 20, 1922"] {
        assert_eq!(
            classifier.classify(&Cell::plain(text)),
            Classification::Rejected(Rejection::Date),
            "{text}"
        );
    }
}

#[test]
fn citations_are_vetoed() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify(&Cell::plain("London[1]")),
        Classification::Rejected(Rejection::Citation)
    );
    assert_eq!(value_of("1.46 m[2]"), None);
}

#[test]
fn text_without_digits_is_not_a_value() {
    let classifier = classifier();
    assert_eq!(
        classifier.classify(&Cell::plain("Nancy Voorhees")),
        Classification::Rejected(Rejection::NoNumber)
    );
    assert_eq!(value_of(""), None);
    assert_eq!(value_of("—"), None);
}

#[test]
fn oversized_integers_are_rejected_when_not_finite() {
    let huge = "9".repeat(400);
    assert_eq!(value_of(&huge), None);
}

#[test]
fn looks_like_date_recognises_month_names() {
    let classifier = classifier();
    for text in [
        "20 May 1922",
        "May 20, 1922",
        "August 1928",
        "15 January 2024",
        "20 Jan 1922",
        "Aug 15, 2024",
        "15 Sept 2023",
        "20 MAY 1922",
        "AUGUST 1928",
        "20 may 1922",
    ] {
        assert!(classifier.looks_like_date(text), "{text}");
    }
}

#[test]
fn looks_like_date_recognises_numeric_formats() {
    let classifier = classifier();
    for text in ["20/05/1922", "20-05-1922", "1922-05-20", "05.20.1922"] {
        assert!(classifier.looks_like_date(text), "{text}");
    }
}

#[test]
fn looks_like_date_rejects_plain_values() {
    let classifier = classifier();
    for text in ["1.46 m", "Nancy Voorhees", "2014", "123", ""] {
        assert!(!classifier.looks_like_date(text), "{text}");
    }
}

#[test]
fn looks_like_measurement_recognises_units() {
    let classifier = classifier();
    for text in [
        "1.46 m",
        "100 cm",
        "5 km",
        "1.5 meter",
        "2.3 metres",
        "5 ft 2 in",
        "6 feet",
        "10 inch",
        "100 yard",
        "5 miles",
        "75 kg",
        "150 lb",
        "200 pound",
        "30 sec",
        "5 min",
        "2 hour",
        "1.46 M",
        "5 FT",
        "100 CM",
        "1.46 m (4 ft 9¼ in)",
    ] {
        assert!(classifier.looks_like_measurement(text), "{text}");
    }
}

#[test]
fn looks_like_measurement_rejects_non_units() {
    let classifier = classifier();
    for text in ["Nancy Voorhees", "20 May 1922", "2014", "Los Angeles", ""] {
        assert!(!classifier.looks_like_measurement(text), "{text}");
    }
}

#[test]
fn has_citation_needs_both_brackets() {
    assert!(has_citation("London[1]"));
    assert!(has_citation("[citation needed]"));
    assert!(!has_citation("London[1"));
    assert!(!has_citation("London 1]"));
}

#[test]
fn word_boundaries_are_ascii_only() {
    assert_eq!(value_of("é1.5"), Some(1.5));
    assert_eq!(value_of("é5"), Some(5.0));
    assert_eq!(value_of("1.5é"), Some(1.5));
}
