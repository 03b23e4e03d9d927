use serde::Serialize;

use crate::error::AppResult;

#[derive(Serialize)]
struct Envelope<'a, T> {
    data: &'a T,
}

/// Prints `{"data": value}` on a single line.
pub fn print<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", render(value)?);
    Ok(())
}

pub fn render<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(&Envelope { data: value })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_data_envelope() {
        let rendered = render(&["a", "b"]).expect("render");
        assert_eq!(rendered, r#"{"data":["a","b"]}"#);
    }
}
