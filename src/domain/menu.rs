use super::Amount;

/// One entry of the price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub price: Amount,
}

const fn item(name: &'static str, price: Amount) -> MenuItem {
    MenuItem { name, price }
}

/// The café's fixed price list. Anything else is sold as a custom item with
/// a price typed in at the till.
pub const MENU: &[MenuItem] = &[
    item("Cà phê đen", 15_000),
    item("Cà phê sữa", 20_000),
    item("Bạc sỉu", 25_000),
    item("Cà phê sữa tươi", 25_000),
    item("Cà phê muối", 25_000),
    item("Matcha latte", 30_000),
    item("Matcha latte kem muối", 35_000),
    item("Nước suối", 10_000),
    item("Bò cụng Thái", 20_000),
    item("Nước ngọt có ga", 15_000),
    item("Cacao latte", 20_000),
    item("Cacao latte kem muối", 25_000),
    item("Cam vắt", 20_000),
    item("Soda chanh", 20_000),
    item("Chanh muối", 15_000),
    item("Chanh đá", 15_000),
    item("Đá me", 15_000),
    item("Lipton (nóng/đá)", 15_000),
    item("Trà tắc", 15_000),
];

/// Look up a menu entry by its exact name.
pub fn find_menu_item(name: &str) -> Option<&'static MenuItem> {
    let name = name.trim();
    MENU.iter().find(|item| item.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let item = find_menu_item("Cà phê đen").unwrap();
        assert_eq!(item.price, 15_000);
        assert_eq!(find_menu_item(" Trà tắc ").unwrap().price, 15_000);
        assert!(find_menu_item("Bánh mì").is_none());
    }

    #[test]
    fn test_menu_prices_are_positive() {
        assert!(MENU.iter().all(|item| item.price > 0));
    }
}
