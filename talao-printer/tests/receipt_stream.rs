//! End-to-end compile of a JSON print job into an ESC/POS stream.

use shared::models::{DocumentPayload, PrinterProfile};
use talao_printer::{build_fiscal_pages, build_receipt, FiscalPageOptions};

const JOB_BODY: &str = r#"{
    "company_name": "Pastelaria Miradouro Lda",
    "company_nif": "NIF 501234567",
    "company_lines": ["Rua das Flores 12", "1200-192 Lisboa"],
    "terminal_name": "Caixa 1",
    "printed_at": "05/08/2026 14:32:10",
    "document_label": "Fatura-Recibo",
    "document_number": "FR 2026/1041",
    "operator_name": "Marta",
    "atcud": "JFX8PJY5-1041",
    "hash_value": "kTgW0B1xCmZqPdVhRyNsAeLoUj3fIb9McEnXtQa7DvHwSk5G",
    "customer_line": "Consumidor Final",
    "items": [
        {"name": "Pastel de nata", "qty": "3", "unit_price": "1.30", "line_total": "3.90"},
        {"name": "Galao", "qty": "1.5", "unit_price": "1.80", "line_total": "2.70"}
    ],
    "totals": {"subtotal": "5.37", "tax": "1.23", "total": "6.60"},
    "tax_lines": [
        {"label": "IVA 23%", "base": "5.37", "tax": "1.23"}
    ],
    "payments": [
        {"label": "Multibanco", "amount": "6.60"}
    ],
    "qr_code": "A:501234567*B:999999990*C:PT*D:FR*H:JFX8PJY5-1041"
}"#;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn json_job_compiles_to_ordered_stream() {
    let payload: DocumentPayload = serde_json::from_str(JOB_BODY).unwrap();
    let profile: PrinterProfile =
        serde_json::from_str(r#"{"id":"front","name":"Balcao","mode":"network"}"#).unwrap();

    let bytes = build_receipt(&payload, &profile, true, None, false);

    // init first, partial cut (profile default) last
    assert_eq!(&bytes[..2], &[0x1B, 0x40]);
    assert_eq!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x01]);

    let company = find(&bytes, b"Pastelaria Miradouro Lda").unwrap();
    let headline = find(&bytes, b"Fatura-Recibo FR 2026/1041").unwrap();
    let operator = find(&bytes, b"Operador: Marta").unwrap();
    let atcud = find(&bytes, b"ATCUD: JFX8PJY5-1041").unwrap();
    let item = find(&bytes, b"Pastel de nata").unwrap();
    let fractional_qty = find(&bytes, b"1.5 x 1,80 EUR").unwrap();
    let subtotal = find(&bytes, b"Subtotal").unwrap();
    let footer = find(&bytes, b"Obrigado pela preferencia").unwrap();

    assert!(company < headline);
    assert!(headline < operator);
    assert!(operator < atcud);
    assert!(atcud < item);
    assert!(item < fractional_qty);
    assert!(fractional_qty < subtotal);
    assert!(subtotal < footer);

    // money renders on the 42-character grid: the total line is bold and flush right
    let total_line = b"TOTAL";
    let total = find(&bytes, total_line).unwrap();
    let line_end = bytes[total..].iter().position(|&x| x == 0x0A).unwrap();
    let line = &bytes[total..total + line_end];
    assert_eq!(line.len(), 42);
    assert!(line.ends_with(b"6,60 EUR"));

    // the QR store-data command carries the fiscal payload
    let qr_payload = b"A:501234567*B:999999990*C:PT*D:FR*H:JFX8PJY5-1041";
    assert!(find(&bytes, qr_payload).is_some());
}

#[test]
fn fiscal_pages_with_no_usable_page_fail_closed() {
    let profile = PrinterProfile::default();
    let pages = vec!["".to_string(), "  ".to_string(), "%%%".to_string()];
    let result = build_fiscal_pages(&pages, &profile, true, None, true, FiscalPageOptions::default());
    assert!(result.is_err());
}
