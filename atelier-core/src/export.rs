//! CSV export encoder
//!
//! Pure string encoding over an ordered snapshot; rows come out in the
//! order the caller provides, so exporting twice over unchanged data
//! yields byte-identical output. Delivery of the bytes (file, download,
//! HTTP body) is the caller's problem.

use crate::orders::{OrderDetail, money};
use crate::utils::time::{format_date_br, format_date_filename};
use chrono::NaiveDate;

/// Which of the two report layouts to encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportVariant {
    /// Full history report with contact, quantity and delivery columns
    Financial,
    /// Compact order notebook with the observation column
    Notebook,
}

impl ExportVariant {
    fn headers(self) -> &'static [&'static str] {
        match self {
            ExportVariant::Financial => &[
                "Data Pedido",
                "Cliente",
                "Contato",
                "Produto",
                "Qtd",
                "Total",
                "Entregue em",
                "Status",
            ],
            ExportVariant::Notebook => &[
                "Data",
                "Cliente",
                "Produto",
                "Valor Total",
                "Status",
                "Observacao",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub delimiter: char,
    /// Render amounts with a decimal comma ("150,00") for
    /// spreadsheet locales that expect it
    pub decimal_comma: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_comma: false,
        }
    }
}

/// Encode a snapshot as CSV text, header row first.
pub fn encode_csv(details: &[OrderDetail], variant: ExportVariant, opts: ExportOptions) -> String {
    let delimiter = opts.delimiter.to_string();
    let mut out = String::new();

    out.push_str(&variant.headers().join(&delimiter));
    out.push('\n');

    for detail in details {
        let row = match variant {
            ExportVariant::Financial => financial_row(detail, opts),
            ExportVariant::Notebook => notebook_row(detail, opts),
        };
        let escaped: Vec<String> = row.iter().map(|f| escape_field(f, opts.delimiter)).collect();
        out.push_str(&escaped.join(&delimiter));
        out.push('\n');
    }

    out
}

/// `{prefix}_{dd-MM-yyyy}.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", format_date_filename(date))
}

fn financial_row(detail: &OrderDetail, opts: ExportOptions) -> Vec<String> {
    let order = &detail.order;
    // Delivery column only carries a date once the order went out
    let delivered_at = if order.is_delivered() {
        format_date_br(order.delivery_date)
    } else {
        String::new()
    };
    vec![
        format_date_br(order.order_date),
        detail.client_name().to_string(),
        detail.client_contact().to_string(),
        detail.items_description(),
        money::total_quantity(&detail.items).to_string(),
        format_amount(order.total_price, opts),
        delivered_at,
        order.status.label().to_string(),
    ]
}

fn notebook_row(detail: &OrderDetail, opts: ExportOptions) -> Vec<String> {
    let order = &detail.order;
    vec![
        format_date_br(order.order_date),
        detail.client_name().to_string(),
        detail.items_description(),
        format_amount(order.total_price, opts),
        order.status.label().to_string(),
        order.observation.clone().unwrap_or_default(),
    ]
}

fn format_amount(value: f64, opts: ExportOptions) -> String {
    let rendered = format!("{:.2}", money::to_f64(money::to_decimal(value)));
    if opts.decimal_comma {
        rendered.replace('.', ",")
    } else {
        rendered
    }
}

/// Quote-wrap fields containing the delimiter, a quote or a line break,
/// doubling internal quotes.
fn escape_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Client, Order, OrderItem, OrderStatus, PaymentMethod, Priority};

    fn detail(client: &str, observation: Option<&str>) -> OrderDetail {
        OrderDetail {
            order: Order {
                id: "o".to_string(),
                client_id: "c".to_string(),
                order_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                delivery_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                delivery_time: None,
                total_price: 150.0,
                down_payment: 50.0,
                payment_method: PaymentMethod::Pix,
                observation: observation.map(str::to_string),
                priority: Priority::Normal,
                images: vec![],
                status: OrderStatus::Pending,
                material_status: false,
                art_status: false,
                created_at: 0,
            },
            client: Some(Client {
                id: "c".to_string(),
                name: client.to_string(),
                contact: Some("11 99999-0000".to_string()),
                address: None,
            }),
            items: vec![
                OrderItem {
                    id: String::new(),
                    order_id: "o".to_string(),
                    product_name: "Jogo de Banheiro".to_string(),
                    quantity: 2,
                    unit_price: 50.0,
                },
                OrderItem {
                    id: String::new(),
                    order_id: "o".to_string(),
                    product_name: "Tapete".to_string(),
                    quantity: 1,
                    unit_price: 50.0,
                },
            ],
        }
    }

    #[test]
    fn financial_layout() {
        let csv = encode_csv(
            &[detail("Dona Maria", None)],
            ExportVariant::Financial,
            ExportOptions::default(),
        );
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Data Pedido,Cliente,Contato,Produto,Qtd,Total,Entregue em,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "01/06/2025,Dona Maria,11 99999-0000,2x Jogo de Banheiro + 1x Tapete,3,150.00,,Pendente"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn delivered_orders_carry_the_delivery_date() {
        let mut d = detail("Dona Maria", None);
        d.order.status = OrderStatus::Delivered;
        let csv = encode_csv(&[d], ExportVariant::Financial, ExportOptions::default());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.ends_with(",10/06/2025,Entregue"));
    }

    #[test]
    fn notebook_layout_with_decimal_comma() {
        let opts = ExportOptions {
            delimiter: ';',
            decimal_comma: true,
        };
        let csv = encode_csv(&[detail("Dona Maria", Some("embrulhar"))], ExportVariant::Notebook, opts);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Data;Cliente;Produto;Valor Total;Status;Observacao"
        );
        assert_eq!(
            lines.next().unwrap(),
            "01/06/2025;Dona Maria;2x Jogo de Banheiro + 1x Tapete;150,00;Pendente;embrulhar"
        );
    }

    #[test]
    fn fields_with_delimiter_or_quotes_are_escaped() {
        let mut d = detail("Maria, \"a Grande\"", None);
        d.items[0].product_name = "Kit\ncozinha".to_string();
        let csv = encode_csv(&[d], ExportVariant::Financial, ExportOptions::default());
        assert!(csv.contains("\"Maria, \"\"a Grande\"\"\""));
        assert!(csv.contains("\"2x Kit\ncozinha + 1x Tapete\""));
    }

    #[test]
    fn deterministic_and_round_trippable() {
        let details = vec![detail("Dona Maria", None), detail("Seu José", None)];
        let opts = ExportOptions::default();
        let first = encode_csv(&details, ExportVariant::Financial, opts);
        assert_eq!(first, encode_csv(&details, ExportVariant::Financial, opts));

        // Numeric and date columns parse back to the source values
        for line in first.lines().skip(1) {
            let fields: Vec<&str> = line.split(',').collect();
            assert!(NaiveDate::parse_from_str(fields[0], "%d/%m/%Y").is_ok());
            assert_eq!(fields[5].parse::<f64>().unwrap(), 150.0);
        }
    }

    #[test]
    fn filename_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(export_filename("historico", date), "historico_01-06-2025.csv");
    }
}
