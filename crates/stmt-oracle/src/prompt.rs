//! Instruction text and response schema sent with every page.

use serde_json::{Value, json};

/// Instruction asking for transaction rows only.
pub const EXTRACTION_INSTRUCTION: &str = "\
Analyze the attached document, which is a page of a bank statement.
Extract only the transaction lines of the movements table.

Ignore completely any other information, such as:
- Page headers (bank name, page number, etc.).
- Page footers.
- Summary balances, opening or closing balances.
- Advertising or contact information.

For each transaction extract the date, the description and the debit or credit amount.
Always normalize dates to the final format 'dd-mm-yyyy'.
Leave the debit empty (null) when the transaction is not a debit, and the credit empty (null) when it is not a credit.
If the page contains no transactions, return an empty list.";

/// Full prompt for one page, including its position in the document.
pub fn page_prompt(page: u32, page_count: u32) -> String {
    format!(
        "{}\n\nThis is page {} of {} of the statement.",
        EXTRACTION_INSTRUCTION, page, page_count
    )
}

/// JSON schema of the expected reply (OpenAPI subset accepted by Gemini).
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "transactions": {
                "type": "ARRAY",
                "description": "Every individual transaction line found on the page.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": {
                            "type": "STRING",
                            "description": "Full transaction date, formatted as dd-mm-yyyy."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Full description or label of the transaction as printed."
                        },
                        "debit": {
                            "type": "STRING",
                            "nullable": true,
                            "description": "Debit amount (money out). Null if not a debit."
                        },
                        "credit": {
                            "type": "STRING",
                            "nullable": true,
                            "description": "Credit amount (money in). Null if not a credit."
                        }
                    },
                    "required": ["date", "description", "debit", "credit"]
                }
            }
        },
        "required": ["transactions"]
    })
}
