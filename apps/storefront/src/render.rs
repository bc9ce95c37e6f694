//! Plain-text rendering of storefront views for the terminal.

use std::fmt::Write;

use crate::commands::cart::CartResponse;
use crate::commands::catalog::{BookCardDto, BookDetailsView, HomeView, ShopView};
use crate::commands::checkout::OrderConfirmationView;
use crate::state::ConfigState;

fn stars(count: u8) -> String {
    "★".repeat(count as usize)
}

fn book_line(out: &mut String, card: &BookCardDto) {
    let _ = writeln!(
        out,
        "[{}] {} by {}  {}  {}",
        card.id,
        card.title,
        card.author,
        card.price_display,
        stars(card.stars)
    );
    if !card.short_description.is_empty() {
        let _ = writeln!(out, "      {}", card.short_description);
    }
}

pub fn home(view: &HomeView) -> String {
    let mut out = String::from("Featured Books\n");
    if view.featured.is_empty() {
        out.push_str("No featured books right now.\n");
    }
    for card in &view.featured {
        book_line(&mut out, card);
    }
    out
}

pub fn shop(view: &ShopView) -> String {
    let mut out = String::from("Shop");
    if !view.query.is_empty() {
        let _ = write!(out, " ({})", view.query);
    }
    let _ = writeln!(out, ": {} result(s)", view.result_count);
    for card in &view.books {
        book_line(&mut out, card);
    }
    out
}

pub fn book_details(view: &BookDetailsView) -> String {
    let card = &view.card;
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.title);
    let _ = writeln!(out, "by {}", card.author);
    let _ = writeln!(out, "{}", stars(card.stars));
    if !view.description.is_empty() {
        let _ = writeln!(out, "\n{}", view.description);
    }
    if let Some(bio) = &view.author_bio {
        let _ = writeln!(out, "\nAbout the author: {}", bio);
    }
    let _ = writeln!(out, "\n{}", card.price_display);
    if let Some(quantity) = view.in_cart {
        let _ = writeln!(out, "In your cart: {}", quantity);
    }
    out
}

/// Cart lines and the order summary.
pub fn cart(response: &CartResponse, config: &ConfigState) -> String {
    if response.items.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::from("Your Cart\n");
    for item in &response.items {
        let _ = writeln!(
            out,
            "[{}] {} x {}  {}",
            item.book.id,
            item.book.title,
            item.quantity,
            config.format_money(item.line_total())
        );
    }

    let totals = &response.totals;
    let _ = writeln!(out, "\nSubtotal  {}", config.format_money(totals.subtotal));
    let _ = writeln!(
        out,
        "Tax ({}%)  {}",
        config.tax_rate.percentage(),
        config.format_money(totals.tax)
    );
    let _ = writeln!(out, "Total     {}", config.format_money(totals.total));
    out
}

pub fn confirmation(view: &OrderConfirmationView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.message);
    if let Some(order_id) = &view.order_id {
        let _ = writeln!(out, "Order: {}", order_id);
    }
    if let Some(total) = &view.total_display {
        let _ = writeln!(out, "Charged: {}", total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Book, BookId, Cart, Money};

    #[test]
    fn test_cart_summary() {
        let a = Book::new(BookId::from(1), "A", "X", Money::from_cents(1000));
        let b = Book::new(BookId::from(2), "B", "Y", Money::from_cents(750));
        let cart = Cart::new().add(&a).add(&a).add(&b);

        let text = cart_text(&cart);
        assert!(text.contains("[1] A x 2  $20.00"));
        assert!(text.contains("Subtotal  $27.50"));
        assert!(text.contains("Tax (7%)  $1.93"));
        assert!(text.contains("Total     $29.43"));
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_text(&Cart::new()), "Your cart is empty.\n");
    }

    fn cart_text(c: &Cart) -> String {
        cart(&CartResponse::from(c), &ConfigState::default())
    }
}
