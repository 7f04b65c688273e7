//! Query command - show the query parameters the app would read from a URL

use anyhow::Result;
use fishtail_core::domain::extract_query_params;

use crate::output;

pub fn run(url: &str, json: bool) -> Result<()> {
    let params = extract_query_params(url);

    if json {
        return output::json(&params);
    }

    if params.is_empty() {
        println!("No query parameters.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in &params {
        table.add_row(vec![key.clone(), value.values().join(", ")]);
    }
    println!("{}", table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_shape() {
        let params = extract_query_params("http://localhost:8080/#/dashboard?a=1&a=2&b=x");
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"a": ["1", "2"], "b": "x"}));
    }
}
