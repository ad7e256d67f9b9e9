use std::collections::HashSet;
use util_domain::value_object::VersionToken;
use util_macros::value_object;

#[value_object]
#[derive(Hash)]
struct OrderLine {
    sku: String,
    qty: u32,
}

#[value_object]
struct Stamp(VersionToken);

fn main() {
    let a = OrderLine { sku: "A-1".into(), qty: 2 };
    let b = a.clone();
    assert_eq!(a, b);
    assert_eq!(OrderLine::default().qty, 0);

    let set: HashSet<OrderLine> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);

    let stamp = Stamp(VersionToken::from_bytes(vec![1, 2]));
    let json = serde_json::to_string(&stamp).unwrap();
    let back: Stamp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stamp);
    assert!(format!("{stamp:?}").starts_with("Stamp"));
}
