use askama::Template;
use rust_decimal::Decimal;
use storefront_types::domain::order::{Order, OrderLine, OrderStatus, Variant};
use storefront_types::ports::notifier::NotifyError;

/// One receipt row, already formatted for display.
struct LineView {
    title: String,
    variant: String,
    quantity: u32,
    price: String,
    total: String,
}

#[derive(Template)]
#[template(path = "email/order_confirmed.html")]
struct OrderConfirmedHtml<'a> {
    order_number: &'a str,
    lines: &'a [LineView],
    total: &'a str,
}

#[derive(Template)]
#[template(path = "email/order_confirmed.txt")]
struct OrderConfirmedText<'a> {
    order_number: &'a str,
    lines: &'a [LineView],
    total: &'a str,
}

#[derive(Template)]
#[template(path = "email/order_failed.html")]
struct OrderFailedHtml<'a> {
    order_number: &'a str,
    status: OrderStatus,
}

#[derive(Template)]
#[template(path = "email/order_failed.txt")]
struct OrderFailedText<'a> {
    order_number: &'a str,
    status: OrderStatus,
}

/// Customer-facing summary of a checkout outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OrderMessage {
    pub fn compose(
        order: &Order,
        items: &[OrderLine],
        status: OrderStatus,
    ) -> Result<Self, NotifyError> {
        let number = order.order_number.to_string();
        let subject = match status {
            OrderStatus::Approved => format!("Your Order {number} is Confirmed"),
            OrderStatus::Declined => format!("Your Order {number} Declined"),
            OrderStatus::Error => format!("Your Order {number} Failed"),
        };

        let (text, html) = if status.is_approved() {
            let lines: Vec<LineView> = items.iter().map(line_view).collect();
            let total = money(items.iter().map(OrderLine::line_total).sum());
            let text = OrderConfirmedText {
                order_number: &number,
                lines: &lines,
                total: &total,
            }
            .render();
            let html = OrderConfirmedHtml {
                order_number: &number,
                lines: &lines,
                total: &total,
            }
            .render();
            (text, html)
        } else {
            let text = OrderFailedText {
                order_number: &number,
                status,
            }
            .render();
            let html = OrderFailedHtml {
                order_number: &number,
                status,
            }
            .render();
            (text, html)
        };

        Ok(Self {
            to: order.customer.email.clone(),
            subject,
            text: text.map_err(template_err)?,
            html: html.map_err(template_err)?,
        })
    }
}

fn template_err(err: askama::Error) -> NotifyError {
    NotifyError::Template(err.to_string())
}

fn line_view(item: &OrderLine) -> LineView {
    LineView {
        title: item.title.clone(),
        variant: describe(&item.variant),
        quantity: item.quantity,
        price: money(item.unit_price),
        total: money(item.line_total()),
    }
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn describe(variant: &Variant) -> String {
    if variant.is_empty() {
        return "standard".into();
    }
    variant
        .iter()
        .map(|(dimension, option)| format!("{dimension}: {option}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storefront_types::domain::order::{Customer, NewOrder};

    fn order(status: OrderStatus) -> Order {
        let lines = vec![
            OrderLine {
                product_id: 1,
                title: "Widget".into(),
                unit_price: Decimal::new(1000, 2),
                variant: Variant::from([("color".to_string(), "Red".to_string())]),
                quantity: 2,
            },
            OrderLine {
                product_id: 2,
                title: "Tote <Large> & Co".into(),
                unit_price: Decimal::new(2499, 2),
                variant: Variant::new(),
                quantity: 1,
            },
        ];
        let customer = Customer {
            full_name: "Alice Doe".into(),
            email: "alice@example.com".into(),
            phone: "5551234567".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
        };
        NewOrder::new(customer, status, lines).into_order(1, Utc::now())
    }

    #[test]
    fn approved_message_itemizes_the_order() {
        let order = order(OrderStatus::Approved);
        let msg = OrderMessage::compose(&order, &order.items, OrderStatus::Approved).unwrap();

        assert_eq!(msg.to, "alice@example.com");
        assert_eq!(
            msg.subject,
            format!("Your Order {} is Confirmed", order.order_number)
        );
        assert!(msg.text.contains(&format!("Order Number: {}", order.order_number)));
        assert!(msg.text.contains("- Widget (color: Red) x 2"));
        assert!(msg.text.contains("Price: $10.00 | Total: $20.00"));
        assert!(msg.text.contains("- Tote <Large> & Co (standard) x 1"));
        assert!(msg.text.contains("Price: $24.99 | Total: $24.99"));
        assert!(msg.text.contains("Total: $44.99"));
        assert!(msg.html.contains("<li>Widget - Variant: color: Red &times; 2"));
        assert!(msg.html.contains("<strong>Total: $44.99</strong>"));
    }

    #[test]
    fn html_body_escapes_catalog_text() {
        let order = order(OrderStatus::Approved);
        let msg = OrderMessage::compose(&order, &order.items, OrderStatus::Approved).unwrap();
        assert!(msg.html.contains("Tote &lt;Large&gt; &amp; Co"));
        assert!(!msg.html.contains("<Large>"));
    }

    #[test]
    fn failed_outcomes_ask_to_retry() {
        let declined = order(OrderStatus::Declined);
        let msg =
            OrderMessage::compose(&declined, &declined.items, OrderStatus::Declined).unwrap();
        assert_eq!(
            msg.subject,
            format!("Your Order {} Declined", declined.order_number)
        );
        assert!(msg.text.starts_with("Oops! Your transaction declined"));
        assert!(msg.text.contains("Please retry or contact support."));
        assert!(!msg.text.contains("Widget"));

        let errored = order(OrderStatus::Error);
        let msg = OrderMessage::compose(&errored, &errored.items, OrderStatus::Error).unwrap();
        assert!(msg.subject.ends_with("Failed"));
        assert!(msg.html.contains("<h1>Oops! Your transaction error</h1>"));
    }
}
