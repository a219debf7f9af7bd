//! Property tests for the record codecs and control totals

use nacha_engine::core::{AchBatch, Batch, ControlTotals};
use nacha_engine::core::totals::ENTRY_HASH_MODULUS;
use nacha_engine::record::field::{calculate_check_digit, check_routing_number};
use nacha_engine::record::{
    Addenda02, Addenda05, Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15,
    Addenda16, Addenda17, Addenda18, Addenda98, Addenda99, AdvBatchControl, AdvEntryDetail,
    AdvFileControl, BatchControl, BatchHeader, EntryDetail, FileControl, FileHeader,
    IatBatchHeader, IatEntryDetail, Record,
};
use nacha_engine::types::{BatchErrorKind, SecCode};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Alphanumeric slot content of exactly `width` characters
fn slot(width: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9 ]{{{width}}}")).unwrap()
}

/// Numeric slot content of exactly `width` digits
fn digits(width: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[0-9]{{{width}}}")).unwrap()
}

fn assert_round_trip<R: Record>(line: &str) -> Result<(), TestCaseError> {
    prop_assert_eq!(line.chars().count(), 94);
    prop_assert_eq!(R::parse(line).to_string(), line);
    Ok(())
}

fn header(sec: SecCode) -> BatchHeader {
    let mut header = BatchHeader::new(200, sec);
    header.company_name = "Name on Account".into();
    header.company_identification = "231380104".into();
    header.company_entry_description = "PAYMENTS".into();
    header.effective_entry_date = "230630".into();
    header.odfi_identification = "12104288".into();
    header
}

fn entry(code: u8, amount: u64) -> EntryDetail {
    let mut entry = EntryDetail::new(code);
    entry.set_rdfi("231380104");
    entry.dfi_account_number = "123456789".into();
    entry.amount = amount;
    entry.individual_name = "Receiver Account Name".into();
    entry
}

proptest! {
    #[test]
    fn entry_detail_round_trips(
        code in prop::sample::select(vec![22u8, 27, 32, 37, 42, 47]),
        rdfi in "[0-9]{8}",
        check in "[0-9]",
        account in "[A-Z0-9][A-Z0-9-]{0,16}",
        amount in 0u64..10_000_000_000,
        id in "[A-Z0-9]{0,15}",
        name in "[A-Z][A-Za-z ]{0,20}[a-z]",
        indicator in 0u8..=1,
        trace in "[0-9]{15}",
    ) {
        let line = format!(
            "6{:02}{}{}{:<17}{:010}{:<15}{:<22}  {}{}",
            code, rdfi, check, account, amount, id, name, indicator, trace
        );
        prop_assert_eq!(line.len(), 94);
        prop_assert_eq!(EntryDetail::parse(&line).to_string(), line);
    }

    #[test]
    fn addenda05_round_trips(
        info in "[A-Za-z0-9*][A-Za-z0-9 *]{0,78}[A-Za-z0-9]",
        sequence in 0u32..10_000,
        entry_sequence in 0u32..10_000_000,
    ) {
        let line = format!("705{:<80}{:04}{:07}", info, sequence, entry_sequence);
        prop_assert_eq!(line.len(), 94);
        prop_assert_eq!(Addenda05::parse(&line).to_string(), line);
    }

    #[test]
    fn file_header_round_trips(
        destination in slot(10),
        origin in slot(10),
        date in slot(6),
        time in slot(4),
        modifier in "[A-Z0-9]",
        destination_name in slot(23),
        origin_name in slot(23),
        reference in slot(8),
    ) {
        let line = format!(
            "101{destination}{origin}{date}{time}{modifier}094101{destination_name}{origin_name}{reference}"
        );
        assert_round_trip::<FileHeader>(&line)?;
    }

    #[test]
    fn file_control_round_trips(
        batches in digits(6),
        blocks in digits(6),
        count in digits(8),
        hash in digits(10),
        debit in digits(12),
        credit in digits(12),
    ) {
        let line = format!("9{batches}{blocks}{count}{hash}{debit}{credit}{:39}", "");
        assert_round_trip::<FileControl>(&line)?;
    }

    #[test]
    fn batch_header_round_trips(
        service_class in prop::sample::select(vec!["200", "220", "225"]),
        company_name in slot(16),
        discretionary in slot(20),
        company_id in slot(10),
        sec in prop::sample::select(vec!["PPD", "CCD", "WEB", "TEL", "CTX"]),
        description in slot(10),
        descriptive_date in slot(6),
        effective_date in slot(6),
        settlement in slot(3),
        status in "[0-2]",
        odfi in digits(8),
        batch_number in digits(7),
    ) {
        let line = format!(
            "5{service_class}{company_name}{discretionary}{company_id}{sec}{description}\
             {descriptive_date}{effective_date}{settlement}{status}{odfi}{batch_number}"
        );
        assert_round_trip::<BatchHeader>(&line)?;
    }

    #[test]
    fn batch_control_round_trips(
        service_class in digits(3),
        count in digits(6),
        hash in digits(10),
        debit in digits(12),
        credit in digits(12),
        company_id in slot(10),
        mac in slot(19),
        odfi in digits(8),
        batch_number in digits(7),
    ) {
        let line = format!(
            "8{service_class}{count}{hash}{debit}{credit}{company_id}{mac}{:6}{odfi}{batch_number}",
            ""
        );
        assert_round_trip::<BatchControl>(&line)?;
    }

    #[test]
    fn addenda02_round_trips(
        reference_one in slot(7),
        reference_two in slot(3),
        terminal in slot(6),
        serial in slot(6),
        date in slot(4),
        authorization in slot(6),
        location in slot(27),
        city in slot(15),
        state in slot(2),
        trace in digits(15),
    ) {
        let line = format!(
            "702{reference_one}{reference_two}{terminal}{serial}{date}{authorization}\
             {location}{city}{state}{trace}"
        );
        assert_round_trip::<Addenda02>(&line)?;
    }

    #[test]
    fn addenda98_round_trips(
        change_code in "C[0-9]{2}",
        original_trace in digits(15),
        original_dfi in digits(8),
        corrected in slot(29),
        trace in digits(15),
    ) {
        let line = format!(
            "798{change_code}{original_trace}{:6}{original_dfi}{corrected}{:15}{trace}",
            "", ""
        );
        assert_round_trip::<Addenda98>(&line)?;
    }

    #[test]
    fn addenda99_round_trips(
        return_code in "R[0-9]{2}",
        original_trace in digits(15),
        date_of_death in slot(6),
        original_dfi in digits(8),
        information in slot(44),
        trace in digits(15),
    ) {
        let line = format!(
            "799{return_code}{original_trace}{date_of_death}{original_dfi}{information}{trace}"
        );
        assert_round_trip::<Addenda99>(&line)?;
    }

    #[test]
    fn iat_batch_header_round_trips(
        service_class in prop::sample::select(vec!["200", "220", "225"]),
        indicator in slot(16),
        fx_indicator in prop::sample::select(vec!["FV", "VF", "FF"]),
        fx_reference_indicator in "[1-3]",
        fx_reference in slot(15),
        country in "[A-Z]{2}",
        originator in slot(10),
        description in slot(10),
        originating_currency in "[A-Z]{3}",
        destination_currency in "[A-Z]{3}",
        effective_date in slot(6),
        settlement in slot(3),
        status in "[0-2]",
        odfi in digits(8),
        batch_number in digits(7),
    ) {
        let line = format!(
            "5{service_class}{indicator}{fx_indicator}{fx_reference_indicator}{fx_reference}\
             {country}{originator}IAT{description}{originating_currency}{destination_currency}\
             {effective_date}{settlement}{status}{odfi}{batch_number}"
        );
        assert_round_trip::<IatBatchHeader>(&line)?;
    }

    #[test]
    fn iat_entry_detail_round_trips(
        code in prop::sample::select(vec!["22", "27", "32", "37"]),
        rdfi in digits(8),
        check in "[0-9]",
        addenda_records in digits(4),
        amount in digits(10),
        account in slot(35),
        ofac in slot(1),
        secondary_ofac in slot(1),
        trace in digits(15),
    ) {
        let line = format!(
            "6{code}{rdfi}{check}{addenda_records}{:13}{amount}{account}{:2}{ofac}{secondary_ofac}1{trace}",
            "", ""
        );
        assert_round_trip::<IatEntryDetail>(&line)?;
    }

    #[test]
    fn addenda10_round_trips(
        transaction_type in slot(3),
        amount in digits(18),
        foreign_trace in slot(22),
        name in slot(35),
        entry_sequence in digits(7),
    ) {
        let line = format!(
            "710{transaction_type}{amount}{foreign_trace}{name}{:6}{entry_sequence}",
            ""
        );
        assert_round_trip::<Addenda10>(&line)?;
    }

    #[test]
    fn iat_party_addenda_round_trip(
        first in slot(35),
        second in slot(35),
        entry_sequence in digits(7),
    ) {
        for type_code in ["11", "12", "16"] {
            let line = format!("7{type_code}{first}{second}{:14}{entry_sequence}", "");
            match type_code {
                "11" => assert_round_trip::<Addenda11>(&line)?,
                "12" => assert_round_trip::<Addenda12>(&line)?,
                _ => assert_round_trip::<Addenda16>(&line)?,
            }
        }
    }

    #[test]
    fn iat_bank_addenda_round_trip(
        name in slot(35),
        qualifier in slot(2),
        identification in slot(34),
        country in slot(3),
        sequence in digits(4),
        entry_sequence in digits(7),
    ) {
        for type_code in ["13", "14"] {
            let line = format!(
                "7{type_code}{name}{qualifier}{identification}{country}{:10}{entry_sequence}",
                ""
            );
            match type_code {
                "13" => assert_round_trip::<Addenda13>(&line)?,
                _ => assert_round_trip::<Addenda14>(&line)?,
            }
        }
        let line = format!(
            "718{name}{qualifier}{identification}{country}{:6}{sequence}{entry_sequence}",
            ""
        );
        assert_round_trip::<Addenda18>(&line)?;
    }

    #[test]
    fn addenda15_round_trips(
        receiver_id in slot(15),
        street in slot(35),
        entry_sequence in digits(7),
    ) {
        let line = format!("715{receiver_id}{street}{:34}{entry_sequence}", "");
        assert_round_trip::<Addenda15>(&line)?;
    }

    #[test]
    fn addenda17_round_trips(
        info in slot(80),
        sequence in digits(4),
        entry_sequence in digits(7),
    ) {
        let line = format!("717{info}{sequence}{entry_sequence}");
        assert_round_trip::<Addenda17>(&line)?;
    }

    #[test]
    fn adv_entry_detail_round_trips(
        code in prop::sample::select(vec!["81", "82", "83", "84", "85", "86", "87", "88"]),
        rdfi in digits(8),
        check in "[0-9]",
        account in slot(15),
        amount in digits(12),
        advice_routing in digits(9),
        file_id in slot(5),
        operator_data in slot(1),
        name in slot(22),
        discretionary in slot(2),
        indicator in "[01]",
        operator_routing in digits(8),
        julian_day in digits(3),
        sequence in digits(4),
    ) {
        let line = format!(
            "6{code}{rdfi}{check}{account}{amount}{advice_routing}{file_id}{operator_data}\
             {name}{discretionary}{indicator}{operator_routing}{julian_day}{sequence}"
        );
        assert_round_trip::<AdvEntryDetail>(&line)?;
    }

    #[test]
    fn adv_batch_control_round_trips(
        count in digits(6),
        hash in digits(10),
        debit in any::<u64>(),
        credit in any::<u64>(),
        operator_data in slot(19),
        odfi in digits(8),
        batch_number in digits(7),
    ) {
        let line = format!(
            "8280{count}{hash}{debit:020}{credit:020}{operator_data}{odfi}{batch_number}"
        );
        assert_round_trip::<AdvBatchControl>(&line)?;
    }

    #[test]
    fn adv_file_control_round_trips(
        batches in digits(6),
        blocks in digits(6),
        count in digits(8),
        hash in digits(10),
        debit in any::<u64>(),
        credit in any::<u64>(),
    ) {
        let line = format!("9{batches}{blocks}{count}{hash}{debit:020}{credit:020}{:23}", "");
        assert_round_trip::<AdvFileControl>(&line)?;
    }

    #[test]
    fn calculated_check_digit_validates(prefix in "[0-9]{8}") {
        let digit = calculate_check_digit(&prefix).unwrap();
        let routing = format!("{}{}", prefix, digit);
        prop_assert!(check_routing_number("RDFIIdentification", &routing).is_ok());
    }

    #[test]
    fn entry_hash_is_truncated(prefixes in prop::collection::vec("[0-9]{8}", 1..300)) {
        let entries: Vec<EntryDetail> = prefixes
            .iter()
            .map(|prefix| {
                let mut entry = EntryDetail::new(22);
                entry.rdfi_identification = prefix.clone();
                entry
            })
            .collect();
        let sum: u64 = prefixes.iter().map(|p| p.parse::<u64>().unwrap()).sum();
        let totals = ControlTotals::tabulate(&entries);
        prop_assert_eq!(totals.entry_hash, sum % ENTRY_HASH_MODULUS);
        prop_assert!(totals.entry_hash < ENTRY_HASH_MODULUS);
    }

    #[test]
    fn debit_only_batches_reject_credits(
        code in prop::sample::select(vec![22u8, 32, 42]),
        amount in 1u64..100_000,
    ) {
        let mut batch = Batch::new(header(SecCode::Tel));
        batch.add_entry(entry(code, amount));
        let err = batch.create().unwrap_err();
        prop_assert_eq!(err.kind, BatchErrorKind::DebitOnly { code });
    }

    #[test]
    fn credit_only_batches_reject_debits(
        code in prop::sample::select(vec![27u8, 37, 47]),
        amount in 1u64..100_000,
    ) {
        let mut batch = Batch::new(header(SecCode::Cie));
        batch.add_entry(entry(code, amount));
        let err = batch.create().unwrap_err();
        prop_assert_eq!(err.kind, BatchErrorKind::CreditOnly { code });
    }
}

#[test]
fn entry_hash_wraps_past_ten_digits() {
    let entries: Vec<EntryDetail> = (0..101)
        .map(|_| {
            let mut entry = EntryDetail::new(22);
            entry.rdfi_identification = "99999999".into();
            entry
        })
        .collect();
    assert_eq!(ControlTotals::tabulate(&entries).entry_hash, 10_099_999_899 % ENTRY_HASH_MODULUS);
}
