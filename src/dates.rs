// `DD/MM/YYYY` becomes `YYYY-MM-DD`; anything else is left for the backend to judge.
pub fn maybe_to_iso_date(input: &str) -> String {
    if !is_day_month_year(input) {
        return input.to_string();
    }
    let (day, month, year) = (&input[0..2], &input[3..5], &input[6..10]);
    format!("{year}-{month}-{day}")
}

fn is_day_month_year(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}
