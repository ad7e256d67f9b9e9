//! 规约（Specification）
//!
//! 仓储的查询条件。任意 `Fn(&T) -> bool` 闭包都是规约，
//! 组合后的规约保留具体类型，不做装箱。
//!

pub trait Specification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And(self, other)
    }

    fn or<S>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        Or(self, other)
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<T, F> Specification<T> for F
where
    F: Fn(&T) -> bool,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self(candidate)
    }
}

/// 两个规约同时满足
#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(A, B);

/// 任一规约满足
#[derive(Debug, Clone, Copy)]
pub struct Or<A, B>(A, B);

#[derive(Debug, Clone, Copy)]
pub struct Not<A>(A);

impl<T, A, B> Specification<T> for And<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) && self.1.is_satisfied_by(candidate)
    }
}

impl<T, A, B> Specification<T> for Or<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) || self.1.is_satisfied_by(candidate)
    }
}

impl<T, A> Specification<T> for Not<A>
where
    A: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.0.is_satisfied_by(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        code: &'static str,
        qty: u32,
    }

    /// 编码前缀匹配
    struct CodePrefix(&'static str);

    impl Specification<Line> for CodePrefix {
        fn is_satisfied_by(&self, line: &Line) -> bool {
            line.code.starts_with(self.0)
        }
    }

    fn lines() -> Vec<Line> {
        vec![
            Line { code: "A-1", qty: 0 },
            Line { code: "A-2", qty: 5 },
            Line { code: "B-1", qty: 3 },
        ]
    }

    fn codes(spec: impl Specification<Line>) -> Vec<&'static str> {
        lines()
            .into_iter()
            .filter(|l| spec.is_satisfied_by(l))
            .map(|l| l.code)
            .collect()
    }

    #[test]
    fn closure_is_specification() {
        assert_eq!(codes(|l: &Line| l.qty > 0), ["A-2", "B-1"]);
    }

    #[test]
    fn combinators() {
        let in_stock = |l: &Line| l.qty > 0;
        assert_eq!(codes(CodePrefix("A").and(in_stock)), ["A-2"]);
        assert_eq!(codes(CodePrefix("B").or(|l: &Line| l.qty == 0)), ["A-1", "B-1"]);
        assert_eq!(codes(CodePrefix("A").not()), ["B-1"]);
    }
}
