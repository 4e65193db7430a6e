//! Document Assembler
//!
//! Lays a [`DocumentModel`] out on the fixed checklist page plan:
//!
//! 1. identity, shipment and invoice summary (once per invoice)
//! 2. item details
//! 3. drawback, ROSCTL, vessel and container details
//! 4. RODTEP claims and declarations
//! 5. supporting document and the signed declaration
//!
//! Each part starts on a fresh page; overflow inside a part adds pages. The
//! running header goes on every page once the page count is known.

use checklist_engine::format::{money, quantity, weight};
use checklist_engine::model::{HeaderFields, InvoiceSummary, LineRow};
use checklist_engine::valuation::RateSource;
use checklist_engine::DocumentModel;
use checklist_pdf::{
    Align, Column, Field, Font, Page, PageLayout, PageNumber, Painter, Table, TextMeasure,
};
use tracing::debug;

use crate::config::ChecklistConfig;

/// Label column of two-column field rows
const LABEL_WIDTH: f32 = 105.0;
const INVOICE_LABEL_WIDTH: f32 = 85.0;

pub fn assemble(model: &DocumentModel, config: &ChecklistConfig, measure: &dyn TextMeasure) -> Vec<Page> {
    let mut layout = PageLayout::new(config.page, config.fonts, config.layout, measure);

    let invoice_count = model.invoices.len();
    for (index, invoice) in model.invoices.iter().enumerate() {
        if index > 0 {
            layout.new_page();
        }
        summary_page(&mut layout, model, invoice, index + 1, invoice_count);
    }

    layout.new_page();
    item_details_page(&mut layout, model);

    layout.new_page();
    duty_page(&mut layout, model);

    layout.new_page();
    rodtep_page(&mut layout, model, config);

    layout.new_page();
    supporting_documents_page(&mut layout, model, config);

    debug!(pages = layout.page_count(), "Checklist laid out");
    let header = &model.header;
    layout.finish(|painter, number| running_header(painter, config, header, number))
}

fn running_header(
    painter: &mut Painter<'_>,
    config: &ChecklistConfig,
    header: &HeaderFields,
    number: PageNumber,
) {
    let fonts = &config.fonts;
    let geometry = *painter.geometry();
    let (left, center, right) = (geometry.left(), geometry.center_x(), geometry.right());
    let top = geometry.margin_top;

    painter.text(center, top, &config.firm.name, Font::Bold, fonts.title, Align::Center);

    let second = top + 13.0;
    painter.text(
        left,
        second,
        &format!("Custom stn: {}", header.custom_station),
        Font::Regular,
        fonts.field_label,
        Align::Left,
    );
    painter.text(
        center,
        second,
        &config.firm.document_title,
        Font::Bold,
        fonts.section_header,
        Align::Center,
    );
    painter.text(
        right,
        second,
        &format!("{}/{}", number.number, number.count),
        Font::Regular,
        fonts.field_label,
        Align::Right,
    );

    let third = top + 40.0;
    painter.text(
        left,
        third,
        &format!("Printed On : {}", header.printed_on),
        Font::Regular,
        fonts.field_label,
        Align::Left,
    );
    painter.text(
        center,
        third,
        &format!("AEO Registration No. {}", header.aeo_registration_no),
        Font::Bold,
        fonts.field_value,
        Align::Center,
    );
    painter.text(
        right,
        third,
        &format!("AEO Role : {}", header.aeo_role),
        Font::Regular,
        fonts.field_label,
        Align::Right,
    );

    painter.rule(geometry.body_top - 6.0, config.layout.rule_width);
}

fn summary_page(
    layout: &mut PageLayout<'_>,
    model: &DocumentModel,
    invoice: &InvoiceSummary,
    number: usize,
    count: usize,
) {
    let shipment = &model.shipment;
    let totals = &model.totals;

    layout.draw_rule();
    layout.advance(4.0);
    pair(layout, ("SB No. / Date", &shipment.sb_no_date), ("Party Ref", &shipment.party_ref));
    pair(layout, ("Job No", &shipment.job_no), ("CHA", &shipment.cha));
    layout.advance(4.0);

    layout.draw_field_row(
        Some(Field::new("EXPORTER DETAILS", "")),
        Some(Field::new("CONSIGNEE", "")),
        0.0,
    );
    let exporter = party_text(&shipment.exporter.name, &shipment.exporter.lines);
    let consignee = party_text(&shipment.consignee.name, &shipment.consignee.lines);
    layout.draw_field_row(Some(Field::new("", &exporter)), Some(Field::new("", &consignee)), 0.0);
    layout.advance(6.0);

    let gross = weight(shipment.gross_weight, &shipment.gross_weight_unit);
    let net = weight(shipment.net_weight, &shipment.net_weight_unit);
    let fob_inr = money(totals.fob_inr);
    let igst_taxable = money(totals.igst_taxable);
    let igst = money(totals.igst);
    let comp_cess = money(totals.comp_cess);
    let combined = money(totals.combined);
    let drawback = money(totals.drawback);
    let rodtep = money(totals.rodtep);
    let rosctl = money(totals.rosctl);

    let left = [
        ("Port Of Loading", shipment.port_of_loading.as_str()),
        ("Port Of Discharge", shipment.port_of_discharge.as_str()),
        ("Port Of Destination", shipment.port_of_destination.as_str()),
        ("Discharge Country", shipment.discharge_country.as_str()),
        ("Country of Dest", shipment.country_of_destination.as_str()),
        ("Master BL No.", shipment.master_bl_no.as_str()),
        ("House BL No.", shipment.house_bl_no.as_str()),
        ("Rotation No/Dt.", shipment.rotation_no.as_str()),
        ("State of Origin", shipment.state_of_origin.as_str()),
        ("Ad. Code", shipment.ad_code.as_str()),
        ("Forex Bank A/c No", shipment.forex_bank_account.as_str()),
        ("RBI Waiver No/Dt", shipment.rbi_waiver_no.as_str()),
        ("DBK Bank A/c No", shipment.dbk_bank_account.as_str()),
    ];
    let right = [
        ("Nature of Cargo", shipment.nature_of_cargo.as_str()),
        ("Total Packages", shipment.total_packages.as_str()),
        ("No Of Cntnrs", shipment.no_of_containers.as_str()),
        ("Loose pkts.", shipment.loose_packets.as_str()),
        ("Gross Weight", gross.as_str()),
        ("Net Weight", net.as_str()),
        ("Total FOB (INR)", fob_inr.as_str()),
        ("IGST Taxable Value(INR)", igst_taxable.as_str()),
        ("IGST Amount(INR)", igst.as_str()),
        ("Comp. Cess (INR)", comp_cess.as_str()),
        (totals.combined_label.as_str(), combined.as_str()),
        ("Total DBK (INR)", drawback.as_str()),
        ("RODTEP Amount(INR)", rodtep.as_str()),
        ("ROSCTL Amount(INR)", rosctl.as_str()),
    ];
    columns(layout, &left, &right, LABEL_WIDTH);

    layout.advance(8.0);
    layout.draw_section_header(&format!("Invoice Details: Invoice {} / {}", number, count));
    invoice_block(layout, invoice);

    layout.advance(8.0);
    pair(
        layout,
        ("Nature Of Payment", shipment.nature_of_payment.as_str()),
        ("Period Of Payment", shipment.period_of_payment.as_str()),
    );
    layout.draw_field_row(Some(Field::new("Marks & Nos", &shipment.marks_and_nos)), None, LABEL_WIDTH);
    layout.advance(6.0);

    let buyer_right = [
        ("AEO Code", shipment.aeo_code.as_str()),
        ("AEO Country", shipment.aeo_country.as_str()),
        ("AEO Role", shipment.aeo_role.as_str()),
        ("Third Party Name & Addr.", shipment.third_party.as_str()),
    ];
    let buyer_left = [("Buyer's Name & Address", shipment.buyer.as_str())];
    columns(layout, &buyer_left, &buyer_right, LABEL_WIDTH);

    layout.advance(6.0);
    pair(layout, ("EOU IEC", &shipment.eou_iec), ("Branch Sno", &shipment.branch_sno));
    layout.draw_field_row(
        Some(Field::new("Factory Address", &shipment.factory_address)),
        None,
        LABEL_WIDTH,
    );
}

fn invoice_block(layout: &mut PageLayout<'_>, invoice: &InvoiceSummary) {
    let value = format!(
        "{} {} / INR {}",
        invoice.currency,
        money(invoice.invoice_value),
        money(invoice.invoice_value_inr)
    );
    let fob = format!(
        "{} {} / INR {}",
        invoice.fob_currency,
        money(invoice.fob_value_fc),
        money(invoice.fob_value_inr)
    );
    let rate = match invoice.rate_source {
        RateSource::RateTable => quantity(invoice.exchange_rate),
        RateSource::JobDefault => format!("{} (job rate)", quantity(invoice.exchange_rate)),
        RateSource::Unity => "1 (rate unavailable)".to_string(),
    };

    let left = [
        ("Inv. No", invoice.invoice_no.as_str()),
        ("Inv. Date", invoice.invoice_date.as_str()),
        ("Nature of contract", invoice.nature_of_contract.as_str()),
        ("Unit Price Includes", invoice.price_includes.as_str()),
        ("Inv. Currency", invoice.currency.as_str()),
    ];
    let right = [
        ("Inv. Value", value.as_str()),
        ("FOB Value", fob.as_str()),
        ("Exp Contract No.", invoice.contract_no.as_str()),
        ("Exp Contract Date", invoice.contract_date.as_str()),
        ("Exch. Rate", rate.as_str()),
    ];
    columns(layout, &left, &right, INVOICE_LABEL_WIDTH);
    layout.advance(6.0);

    let mut table = Table::new(vec![
        Column::new("", 110.0),
        Column::new("Rate", 70.0).align(Align::Right),
        Column::new("Currency", 70.0),
        Column::new("Amount", 90.0).align(Align::Right),
    ]);
    for charge in &invoice.charges {
        table.row([
            charge.label.clone(),
            charge.rate.map(quantity).unwrap_or_default(),
            charge.currency.clone(),
            charge.amount.map(money).unwrap_or_default(),
        ]);
    }
    layout.draw_table(&table);
}

fn item_details_page(layout: &mut PageLayout<'_>, model: &DocumentModel) {
    layout.draw_section_header("ITEM DETAILS");

    // Foreign FOB only adds up within one currency
    let fc_totals = model.fob_fc_by_currency();
    let fob_fc = Column::new("FOB Val FC", 55.0).align(Align::Right);
    let fob_fc = if fc_totals.len() == 1 { fob_fc.summed(2) } else { fob_fc };

    let mut table = Table::new(vec![
        Column::new("Inv / SI No\nQty\nUnit", 50.0),
        Column::new("RITC\nExim Scheme\nNFEI Catg\nReward Item", 80.0),
        Column::new("Description\nUnit Price / Unit", 140.0),
        fob_fc,
        Column::new("FOB Val INR", 65.0).align(Align::Right).summed(2),
        Column::new("Total Value FC\nIGST Pymt Status", 55.0).align(Align::Right),
        Column::new("PMV/Unit\nIGST Taxable Value", 55.0).align(Align::Right),
        Column::new("Total PMV INR\nIGST Amount", 55.0).align(Align::Right),
    ]);
    table.total_label = "Total".to_string();
    for line in &model.lines {
        table.row_with_amounts(item_cells(line), [(3, line.fob_fc), (4, line.fob_inr)]);
    }
    layout.draw_table(&table);
    layout.advance(8.0);

    let totals = &model.totals;
    let pmv = money(totals.pmv);
    let igst = money(totals.igst);
    let taxable = money(totals.igst_taxable);
    let cess = money(totals.comp_cess);
    let fc_rows: Vec<(String, String)> = if fc_totals.len() > 1 {
        fc_totals
            .iter()
            .map(|(currency, total)| (format!("Total FOB ({})", currency), money(*total)))
            .collect()
    } else {
        Vec::new()
    };
    let left: Vec<(&str, &str)> = fc_rows.iter().map(|(l, v)| (l.as_str(), v.as_str())).collect();
    let rows = [
        ("Total PMV", pmv.as_str()),
        ("Total IGST Taxable Value", taxable.as_str()),
        ("Total IGST", igst.as_str()),
        ("Total Comp. Cess", cess.as_str()),
    ];
    columns(layout, &left, &rows, LABEL_WIDTH);
}

fn item_cells(line: &LineRow) -> Vec<String> {
    let per = if line.per.is_empty() { &line.unit } else { &line.per };
    let price_unit = if line.price_unit.is_empty() {
        per.clone()
    } else {
        format!("{} {}", line.price_unit, per)
    };
    vec![
        format!("{} / {}\n{}\n{}", line.invoice_no, line.item_no, quantity(line.quantity), line.unit),
        format!(
            "{}\n{}\n{}\n{}",
            line.ritc,
            line.exim_scheme,
            line.nfei_category,
            if line.reward_item { "Yes" } else { "No" }
        ),
        description_cell(line, price_unit.trim()),
        money(line.fob_fc),
        money(line.fob_inr),
        format!("{}\n{}", money(line.amount), line.igst_status),
        format!("{}\n{}", money(line.pmv_per_unit), money(line.igst_taxable)),
        format!("{}\n{}", money(line.total_pmv), money(line.igst_amount)),
    ]
}

/// Description, then `price / unit` when the line carries a unit price
fn description_cell(line: &LineRow, price_unit: &str) -> String {
    if line.unit_price <= 0.0 {
        return line.description.clone();
    }
    let price = quantity(line.unit_price);
    if price_unit.is_empty() {
        format!("{}\n{}", line.description, price)
    } else {
        format!("{}\n{} / {}", line.description, price, price_unit)
    }
}

fn duty_page(layout: &mut PageLayout<'_>, model: &DocumentModel) {
    let schemes = &model.schemes;

    layout.draw_section_header("DBK DETAILS");
    let mut dbk = Table::new(vec![
        Column::new("Inv No", 80.0),
        Column::new("Item No", 45.0),
        Column::new("DBK SI No", 90.0),
        Column::new("DBK Rate (%)", 65.0).align(Align::Right),
        Column::new("DBK Qty / Unit", 90.0),
        Column::new("DBK Cap", 70.0).align(Align::Right),
        Column::new("DBK Amount", 90.0).align(Align::Right).summed(2),
    ]);
    for row in &schemes.dbk_rows {
        let cells = [
            row.invoice_no.clone(),
            row.item_no.clone(),
            row.dbk_sr_no.clone(),
            quantity(row.rate),
            format!("{} / {}", quantity(row.quantity), row.unit),
            money(row.cap),
            money(row.amount),
        ];
        dbk.row_with_amounts(cells, [(6, row.amount)]);
    }
    layout.draw_table(&dbk);
    layout.advance(10.0);

    layout.draw_section_header("ROSCTL DETAILS");
    let mut rosctl = Table::new(vec![
        Column::new("Inv No", 70.0),
        Column::new("Item No", 40.0),
        Column::new("Tariff Item", 70.0),
        Column::new("Category", 60.0),
        Column::new("SL Rate", 50.0).align(Align::Right),
        Column::new("SL Cap", 50.0).align(Align::Right),
        Column::new("CTL Rate", 50.0).align(Align::Right),
        Column::new("CTL Cap", 50.0).align(Align::Right),
        Column::new("ROSCTL Amount", 85.0).align(Align::Right).summed(2),
    ]);
    for row in &schemes.rosctl_rows {
        let cells = [
            row.invoice_no.clone(),
            row.item_no.clone(),
            row.tariff_item.clone(),
            row.category.clone(),
            quantity(row.sl_rate),
            money(row.sl_cap),
            quantity(row.ctl_rate),
            money(row.ctl_cap),
            money(row.amount),
        ];
        rosctl.row_with_amounts(cells, [(8, row.amount)]);
    }
    layout.draw_table(&rosctl);
    layout.advance(10.0);

    layout.draw_section_header("VESSEL DETAILS");
    let vessel = &model.vessel;
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let left_x = layout.geometry().left();
    let width = layout.geometry().content_width();
    for (label, value) in [
        ("Factory Stuffed", yes_no(vessel.factory_stuffed)),
        ("Seal Type", vessel.seal_type.as_str()),
        ("Sample Acc.", yes_no(vessel.sample_accompanied)),
        ("Vessel Name", vessel.vessel_name.as_str()),
        ("Voyage Number", vessel.voyage_no.as_str()),
    ] {
        layout.draw_labeled_field(label, value, left_x, LABEL_WIDTH, width);
    }
    layout.advance(10.0);

    layout.draw_section_header("CONTAINER DETAILS");
    let mut containers = Table::new(vec![
        Column::new("Container No", 85.0),
        Column::new("Size", 35.0),
        Column::new("Type", 40.0),
        Column::new("Seal No", 75.0),
        Column::new("Seal Type", 55.0),
        Column::new("Seal Date", 65.0),
        Column::new("Seal Device ID", 75.0),
        Column::new("Pkgs", 50.0).align(Align::Right).summed(0),
        Column::new("Gross Wt", 65.0).align(Align::Right).summed(3),
    ]);
    for row in &model.containers {
        let cells = [
            row.container_no.clone(),
            row.size.clone(),
            row.kind.clone(),
            row.seal_no.clone(),
            row.seal_type.clone(),
            row.seal_date.clone(),
            row.seal_device_id.clone(),
            quantity(row.packages),
            format!("{:.3}", row.gross_weight),
        ];
        containers.row_with_amounts(cells, [(7, row.packages), (8, row.gross_weight)]);
    }
    layout.draw_table(&containers);
    layout.advance(10.0);

    layout.draw_section_header("Additional Details");
    let mut additional = Table::new(vec![
        Column::new("Inv/Item SLN", 90.0),
        Column::new("SQC Qty/Unit", 80.0),
        Column::new("Origin District", 90.0),
        Column::new("Origin State", 90.0),
        Column::new("Comp. Cess Amount(INR)", 100.0).align(Align::Right),
        Column::new("PTA/FTA", 100.0),
    ]);
    for line in &model.lines {
        let sqc = if line.sqc_quantity > 0.0 {
            format!("{} {}", quantity(line.sqc_quantity), line.sqc_unit)
        } else {
            String::new()
        };
        additional.row([
            format!("{} / {}", line.invoice_no, line.item_no),
            sqc,
            line.origin_district.clone(),
            line.origin_state.clone(),
            money(line.comp_cess),
            line.pta_fta.clone(),
        ]);
    }
    layout.draw_table(&additional);
    layout.advance(10.0);

    layout.draw_section_header("END USE INFORMATION");
    let mut end_use = Table::new(vec![Column::new("Inv / Item Sr.No.", 120.0), Column::new("Code", 120.0)]);
    for line in model.lines.iter().filter(|l| !l.end_use.is_empty()) {
        end_use.row([format!("{} / {}", line.invoice_no, line.item_no), line.end_use.clone()]);
    }
    layout.draw_table(&end_use);
}

fn rodtep_page(layout: &mut PageLayout<'_>, model: &DocumentModel, config: &ChecklistConfig) {
    layout.draw_section_header("RODTEP Info");
    let mut rodtep = Table::new(vec![
        Column::new("Inv/Item Sr", 90.0),
        Column::new("Claim Status", 70.0),
        Column::new("Quantity", 70.0).align(Align::Right),
        Column::new("Unit", 50.0),
        Column::new("Rate (in %)", 60.0).align(Align::Right),
        Column::new("Cap Value", 70.0).align(Align::Right),
        Column::new("RODTEP Amount (INR)", 110.0).align(Align::Right).summed(2),
    ]);
    for row in &model.schemes.rodtep_rows {
        let cells = [
            format!("{} / {}", row.invoice_no, row.item_no),
            "RODTEPY".to_string(),
            quantity(row.quantity),
            row.unit.clone(),
            quantity(row.rate_percent),
            money(row.cap_value),
            money(row.amount),
        ];
        rodtep.row_with_amounts(cells, [(6, row.amount)]);
    }
    layout.draw_table(&rodtep);
    layout.advance(10.0);

    layout.draw_section_header("DECLARATIONS");
    let mut declarations = Table::new(vec![
        Column::new("Decl. Typ", 60.0),
        Column::new("Decl. Cod", 60.0),
        Column::new("Inv / Item Sr.No.", 100.0),
    ]);
    for row in &model.declarations {
        declarations.row([
            row.declaration_type.clone(),
            row.code.clone(),
            format!("{} / {}", row.invoice_no, row.item_no),
        ]);
    }
    layout.draw_table(&declarations);

    if !model.declarations.is_empty() {
        layout.advance(10.0);
        let size = layout.fonts().declaration;
        let width = layout.geometry().content_width();
        layout.draw_paragraph("RD001", width, Font::Bold, size);
        layout.draw_paragraph(&config.declarations.rodtep, width, Font::Regular, size);
    }
}

fn supporting_documents_page(layout: &mut PageLayout<'_>, model: &DocumentModel, config: &ChecklistConfig) {
    layout.draw_section_header("SUPPORTING DOCUMENTS");

    match &model.supporting_document {
        Some(doc) => {
            let issuing = &doc.issuing_party;
            let beneficiary = &doc.beneficiary_party;
            let left = [
                ("Inv/Item/SrNo.", doc.inv_item_sr_no.as_str()),
                ("Image Ref.No.(IRN)", doc.irn.as_str()),
                ("ICEGATE ID", doc.icegate_id.as_str()),
                ("Doc Type Code", doc.document_type.as_str()),
                ("Doc Ref.No.", doc.document_reference_no.as_str()),
                ("Doc Name", doc.document_name.as_str()),
                ("File Type", doc.file_type.as_str()),
                ("Doc Issue Date", doc.date_of_issue.as_str()),
                ("Doc Expiry Date", doc.expiry_date.as_str()),
                ("Doc Uploaded On", doc.uploaded_on.as_str()),
                ("Place of Issue", doc.place_of_issue.as_str()),
                ("Issuing Party Code", issuing.code.as_str()),
                ("Beneficiary Party Code", beneficiary.code.as_str()),
            ];
            let right = [
                ("Issuing Party Name", issuing.name.as_str()),
                ("Issuing Party Add1", issuing.address_line1.as_str()),
                ("Issuing Party Add2", issuing.address_line2.as_str()),
                ("Issuing Party City", issuing.city.as_str()),
                ("Issuing Party Pin Code", issuing.pin_code.as_str()),
                ("Beneficiary Party Name", beneficiary.name.as_str()),
                ("Beneficiary Party Add1", beneficiary.address_line1.as_str()),
                ("Beneficiary Party Add2", beneficiary.address_line2.as_str()),
                ("Beneficiary Party City", beneficiary.city.as_str()),
                ("Beneficiary Party Pin Code", beneficiary.pin_code.as_str()),
            ];
            columns(layout, &left, &right, LABEL_WIDTH);
        }
        None => {
            let width = layout.geometry().content_width();
            let size = layout.fonts().field_value;
            layout.draw_paragraph("No supporting documents uploaded", width, Font::Regular, size);
        }
    }
    layout.advance(12.0);

    layout.draw_section_header("DECLARATION");
    let size = layout.fonts().declaration;
    let width = layout.geometry().content_width();
    layout.draw_paragraph(&config.declarations.final_declaration, width, Font::Regular, size);

    layout.advance(20.0);
    layout.ensure_space(size + 12.0);
    let left = layout.geometry().left();
    layout.text_at(left, &config.declarations.signature_caption, Font::Bold, size, Align::Left);
    layout.advance(size + 6.0);
    let (y, rule_width) = (layout.cursor().y, layout.metrics().rule_width);
    let right = layout.geometry().right() - 200.0;
    layout.painter().line(left, y, right, y, rule_width);
}

/// Two independent label/value columns drawn row by row
fn columns(layout: &mut PageLayout<'_>, left: &[(&str, &str)], right: &[(&str, &str)], label_width: f32) {
    let rows = left.len().max(right.len());
    for i in 0..rows {
        let l = left.get(i).map(|(label, value)| Field::new(label, value));
        let r = right.get(i).map(|(label, value)| Field::new(label, value));
        layout.draw_field_row(l, r, label_width);
    }
}

fn pair(layout: &mut PageLayout<'_>, left: (&str, &str), right: (&str, &str)) {
    layout.draw_field_row(
        Some(Field::new(left.0, left.1)),
        Some(Field::new(right.0, right.1)),
        LABEL_WIDTH,
    );
}

fn party_text(name: &str, lines: &[String]) -> String {
    std::iter::once(name)
        .chain(lines.iter().map(String::as_str))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
