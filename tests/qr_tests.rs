#![cfg(feature = "qr")]

use rust_decimal_macros::dec;
use zahlteil::core::*;
use zahlteil::qr::*;

fn creditor() -> Address {
    AddressBuilder::new("Muster & Söhne AG", "8001", "Zürich", "CH")
        .street("Bahnhofstrasse")
        .house_number("7")
        .build()
}

fn debtor() -> Address {
    AddressBuilder::new("Pia Rutschmann", "9400", "Rorschach", "CH")
        .street("Marktgasse")
        .house_number("28")
        .build()
}

// --- Account classification ---

#[test]
fn iid_30034_is_reference_capable() {
    let account = Account::parse("CH3830034123456789012").unwrap();
    assert_eq!(account.kind(), AccountKind::QrIban);
    assert_eq!(account.iid(), Some(30_034));

    let reference = Reference::for_account(&account, "RE-2026-007").unwrap();
    let Reference::Qr(reference) = reference else {
        panic!("expected a QR reference");
    };
    assert_eq!(reference.as_str().len(), 27);
    assert_eq!(reference.as_str(), "000000000000000000020260073");
    assert_eq!(reference.check_digit(), 3);
}

#[test]
fn iid_08888_never_gets_a_reference() {
    let account = Account::parse("CH3808888123456789012").unwrap();
    assert_eq!(account.kind(), AccountKind::Iban);

    for document_id in ["RE-2026-007", "7", "egal"] {
        let reference = Reference::for_account(&account, document_id).unwrap();
        assert_eq!(reference, Reference::None);
    }
}

#[test]
fn classification_is_deterministic() {
    let a = Account::parse("CH4431999123000889012").unwrap();
    let b = Account::parse("ch44 3199 9123 0008 8901 2").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.kind(), b.kind());
}

#[test]
fn display_groupings() {
    let account = Account::parse("CH4431999123000889012").unwrap();
    assert_eq!(account.grouped(), "CH44 3199 9123 0008 8901 2");

    let reference = QrReference::from_document_id("RE-2026-007").unwrap();
    assert_eq!(reference.grouped(), "00 00000 00000 00000 00202 60073");
}

// --- Payload assembly ---

fn qr_slip() -> PaymentSlip {
    PaymentSlipBuilder::new(
        Account::parse("CH4431999123000889012").unwrap(),
        creditor(),
        dec!(242.35),
        "CHF",
        debtor(),
    )
    .document_id("RE-2026-007")
    .message("Rechnung RE-2026-007")
    .build()
    .unwrap()
}

#[test]
fn payload_field_order_and_terminator() {
    let payload = qr_slip().to_payload().unwrap();
    assert_eq!(
        payload,
        "SPC\r\n0200\r\n1\r\nCH4431999123000889012\r\nS\r\nMuster & Söhne AG\r\nBahnhofstrasse\r\n7\r\n8001\r\nZürich\r\nCH\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n242.35\r\nCHF\r\nS\r\nPia Rutschmann\r\nMarktgasse\r\n28\r\n9400\r\nRorschach\r\nCH\r\nQRR\r\n000000000000000000020260073\r\nRechnung RE-2026-007\r\nEPD"
    );
}

#[test]
fn payload_snapshot() {
    let payload = qr_slip().to_payload().unwrap();
    insta::assert_snapshot!(payload.replace("\r\n", "\n"), @r"
SPC
0200
1
CH4431999123000889012
S
Muster & Söhne AG
Bahnhofstrasse
7
8001
Zürich
CH







242.35
CHF
S
Pia Rutschmann
Marktgasse
28
9400
Rorschach
CH
QRR
000000000000000000020260073
Rechnung RE-2026-007
EPD
");
}

#[test]
fn assembly_is_idempotent() {
    let slip = qr_slip();
    assert_eq!(slip.to_payload().unwrap(), slip.to_payload().unwrap());
}

#[test]
fn decode_roundtrip_with_all_optional_fields() {
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH4431999123000889012").unwrap(),
        creditor(),
        dec!(1949.75),
        "CHF",
        debtor(),
    )
    .ultimate_creditor(
        AddressBuilder::new("Holding Muster AG", "3000", "Bern", "CH").build(),
    )
    .document_id("RE-2026-012")
    .message("Teilzahlung")
    .billing_info("//S1/10/RE-2026-012/30/106017086")
    .build()
    .unwrap();

    let payload = slip.to_payload().unwrap();
    let decoded = PaymentSlip::from_payload(&payload).unwrap();
    assert_eq!(decoded, slip);
    assert_eq!(decoded.to_payload().unwrap(), payload);
}

#[test]
fn decode_accepts_bare_newlines() {
    let payload = qr_slip().to_payload().unwrap().replace("\r\n", "\n");
    let decoded = PaymentSlip::from_payload(&payload).unwrap();
    assert_eq!(decoded, qr_slip());
}

#[test]
fn minimal_address_roundtrip() {
    // Street and house number are optional.
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        AddressBuilder::new("Verein Pro Juventute", "8050", "Zürich", "CH").build(),
        dec!(50.00),
        "CHF",
        AddressBuilder::new("Hans Keller", "4051", "Basel", "CH").build(),
    )
    .build()
    .unwrap();

    let decoded = PaymentSlip::from_payload(&slip.to_payload().unwrap()).unwrap();
    assert_eq!(decoded.creditor.street, None);
    assert_eq!(decoded, slip);
}

#[test]
fn country_written_uppercase() {
    let mut address = creditor();
    address.country = "ch".into();
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        address,
        dec!(10.00),
        "CHF",
        debtor(),
    )
    .build()
    .unwrap();
    let payload = slip.to_payload().unwrap();
    assert!(payload.contains("\r\nZürich\r\nCH\r\n"));
}

#[test]
fn euro_amounts_supported() {
    let slip = PaymentSlipBuilder::new(
        Account::parse("DE89370400440532013000").unwrap(),
        creditor(),
        dec!(99.90),
        "EUR",
        debtor(),
    )
    .build()
    .unwrap();
    let payload = slip.to_payload().unwrap();
    assert!(payload.contains("\r\n99.90\r\nEUR\r\n"));
}

// --- Validation errors ---

#[test]
fn unsupported_character_names_the_field() {
    let mut address = debtor();
    address.city = "«Rorschach»".into();
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        creditor(),
        dec!(10.00),
        "CHF",
        address,
    )
    .build()
    .unwrap();

    assert_eq!(
        slip.to_payload().unwrap_err(),
        ZahlteilError::UnsupportedCharacter {
            field: "debtor.city".into(),
            character: '«',
        }
    );
}

#[test]
fn message_with_euro_sign_rejected() {
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        creditor(),
        dec!(10.00),
        "CHF",
        debtor(),
    )
    .message("Rabatt 5 €")
    .build()
    .unwrap();

    assert_eq!(
        slip.to_payload().unwrap_err(),
        ZahlteilError::UnsupportedCharacter {
            field: "message".into(),
            character: '€',
        }
    );
}

#[test]
fn incomplete_address_names_role_and_field() {
    let mut address = debtor();
    address.postal_code = "  ".into();
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        creditor(),
        dec!(10.00),
        "CHF",
        address,
    )
    .build()
    .unwrap();

    assert_eq!(
        slip.to_payload().unwrap_err(),
        ZahlteilError::IncompleteAddress {
            role: AddressRole::Debtor,
            field: "postal_code",
        }
    );
}

#[test]
fn unresolved_country_rejected() {
    let mut address = creditor();
    address.country = String::new();
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        address,
        dec!(10.00),
        "CHF",
        debtor(),
    )
    .build()
    .unwrap();

    assert_eq!(
        slip.to_payload().unwrap_err(),
        ZahlteilError::IncompleteAddress {
            role: AddressRole::Creditor,
            field: "country",
        }
    );
}

#[test]
fn plain_iban_with_qr_reference_rejected() {
    let slip = PaymentSlipBuilder::new(
        Account::parse("CH9300762011623852957").unwrap(),
        creditor(),
        dec!(10.00),
        "CHF",
        debtor(),
    )
    .reference(Reference::Qr(
        QrReference::from_document_id("RE-2026-007").unwrap(),
    ))
    .build()
    .unwrap();

    assert!(matches!(
        slip.to_payload().unwrap_err(),
        ZahlteilError::ReferenceMismatch(_)
    ));
}

// --- Decoding foreign payloads ---

fn scor_payload() -> String {
    [
        "SPC",
        "0200",
        "1",
        "CH9300762011623852957",
        "S",
        "Muster & Söhne AG",
        "Bahnhofstrasse",
        "7",
        "8001",
        "Zürich",
        "CH",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "199.95",
        "CHF",
        "S",
        "Pia Rutschmann",
        "Marktgasse",
        "28",
        "9400",
        "Rorschach",
        "CH",
        "SCOR",
        "RF18539007547034",
        "",
        "EPD",
    ]
    .join("\r\n")
}

#[test]
fn scor_reference_tolerated_on_decode() {
    let slip = PaymentSlip::from_payload(&scor_payload()).unwrap();
    assert_eq!(
        slip.reference,
        Reference::Creditor("RF18539007547034".into())
    );
    // Tolerated and re-encoded verbatim.
    assert_eq!(slip.to_payload().unwrap(), scor_payload());
}

#[test]
fn unknown_reference_type_rejected() {
    let payload = scor_payload().replace("\r\nSCOR\r\n", "\r\nISR\r\n");
    assert!(matches!(
        PaymentSlip::from_payload(&payload).unwrap_err(),
        ZahlteilError::MalformedPayload(_)
    ));
}

#[test]
fn corrupted_reference_checksum_surfaces() {
    let payload = qr_slip()
        .to_payload()
        .unwrap()
        .replace("000000000000000000020260073", "000000000000000000020260074");
    assert!(matches!(
        PaymentSlip::from_payload(&payload).unwrap_err(),
        ZahlteilError::ChecksumMismatch { .. }
    ));
}

#[test]
fn wrong_header_rejected() {
    for payload in [
        qr_slip().to_payload().unwrap().replacen("SPC", "XXX", 1),
        qr_slip().to_payload().unwrap().replacen("0200", "0100", 1),
    ] {
        assert!(matches!(
            PaymentSlip::from_payload(&payload).unwrap_err(),
            ZahlteilError::MalformedPayload(_)
        ));
    }
}

#[test]
fn truncated_payload_rejected() {
    let payload = qr_slip().to_payload().unwrap();
    let truncated = payload.rsplit_once("\r\n").unwrap().0;
    assert!(matches!(
        PaymentSlip::from_payload(truncated).unwrap_err(),
        ZahlteilError::MalformedPayload(_)
    ));
}

#[test]
fn combined_address_format_rejected() {
    let payload = scor_payload().replacen("S\r\nMuster", "K\r\nMuster", 1);
    assert!(matches!(
        PaymentSlip::from_payload(&payload).unwrap_err(),
        ZahlteilError::MalformedPayload(_)
    ));
}

// --- Serde ---

#[test]
fn account_serializes_as_compact_string() {
    let account = Account::parse("CH44 3199 9123 0008 8901 2").unwrap();
    let json = serde_json::to_string(&account).unwrap();
    assert_eq!(json, "\"CH4431999123000889012\"");

    let back: Account = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind(), AccountKind::QrIban);
}

#[test]
fn account_deserialization_revalidates() {
    let result: Result<Account, _> = serde_json::from_str("\"CH4531999123000889012\"");
    assert!(result.is_err());
}

#[test]
fn slip_serde_roundtrip() {
    let slip = qr_slip();
    let json = serde_json::to_string(&slip).unwrap();
    let back: PaymentSlip = serde_json::from_str(&json).unwrap();
    assert_eq!(back, slip);
}

// --- Totals engine feeds the assembler ---

#[test]
fn totals_to_slip_amount_flow() {
    let config = BillingConfig {
        tax_enabled: true,
        default_tax_rate: dec!(7.7),
        currency: "CHF".into(),
        home_country: "CH".into(),
    };
    let lines = vec![
        LineItemBuilder::new("Arbeit", dec!(2), dec!(100.00)).build(),
        LineItemBuilder::new("Material", dec!(1), dec!(50.00)).build(),
    ];
    let totals = compute_totals(&lines, Some(&Discount::Percent(dec!(10))), &config).unwrap();

    let slip = PaymentSlipBuilder::new(
        Account::parse("CH4431999123000889012").unwrap(),
        creditor(),
        round_to_five_rappen(totals.grand_total),
        config.currency.clone(),
        debtor(),
    )
    .document_id("RE-2026-007")
    .build()
    .unwrap();

    let payload = slip.to_payload().unwrap();
    assert!(payload.contains("\r\n242.35\r\nCHF\r\n"));
}
