mod extractor;

pub use extractor::CandidateFieldExtractor;

/// The fixed candidate field map: key and pattern, in match order.
///
/// Every pattern is compiled case-insensitive with `.` matching newlines, and
/// capture group 1 is the field value.
pub const CANDIDATE_PATTERNS: &[(&str, &str)] = &[
    // Name parts, written as `_FIRST_MIDDLE_LAST_ (` on the form
    ("first_name", r"Name.*?\(Block Letters.*?\):.*?_(.*?)_.*?_.*?_.*?\("),
    ("middle_name", r"Name.*?\(Block Letters.*?\):.*?_.*?_(.*?)_.*?_.*?\("),
    ("last_name", r"Name.*?\(Block Letters.*?\):.*?_.*?_.*?_(.*?)_.*?\("),

    // Permanent address block
    ("permanent_street", r"2\.\s*Permanent Address:.*?Street Address:\s*_+(.*?)_+"),
    ("permanent_city", r"Permanent Address:.*?City:\s*_+(.*?)_+"),
    ("permanent_state", r"Permanent Address:.*?State:\s*_+(.*?)_+"),
    ("permanent_zip", r"Permanent Address:.*?Zip Code:\s*_+(.*?)_+"),
    ("permanent_country", r"Permanent Address:.*?Country:\s*_+(.*?)_+"),

    // Current address block
    ("current_street", r"Current Address:.*?Street Address:\s*_+(.*?)_+"),
    ("current_city", r"Current Address:.*?City:\s*_+(.*?)_+"),
    ("current_state", r"Current Address:.*?State:\s*_+(.*?)_+"),
    ("current_zip", r"Current Address:.*?Zip Code:\s*_+(.*?)_+"),
    ("current_country", r"Current Address:.*?Country:\s*_+(.*?)_+"),

    // Personal details
    ("dob", r"Date of Birth:\s*(\d{2}\s*/\s*\d{2}\s*/\s*\d{4})"),
    ("age", r"Age:\s*(\d+)"),
    ("gender", r"Gender:\s*([FM])"),
    ("passport", r"Passport:\s*(\w+)"),
    ("mobile", r"Mobile:\s*_*(\d+)_*"),
    ("pan", r"PAN No\.:\s*(\w+)"),
    ("visa", r"Visa:\s*([^_\n]+)"),
    ("email", r"Email ID:\s*([^\n_]+)"),

    // Emergency contact and relocation
    ("emergency_contact", r"Name of Emergency Contact:\s*([^\n_]+)"),
    ("emergency_number", r"Emergency Contact's Number:\s*(\d+)"),
    ("relocation", r"Available for Relocation:\s*(\w+)"),
];
