// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pair based lists, for code that wants to share tails (the reader
//! itself produces `Value::List`, which is Vec based).

use crate::value::Value;
use std::cell::OnceCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Tail {
    Nil,
    Pair(Rc<Pair>),
    /// Improper end, as in `(a . b)`
    Dotted(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub head: Value,
    pub tail: Tail,
}

impl Pair {
    pub fn new(head: Value, tail: Tail) -> Pair {
        Pair { head, tail }
    }

    /// Proper if the tail is nil or another pair.
    pub fn is_proper(&self) -> bool {
        !self.is_dotted()
    }

    pub fn is_dotted(&self) -> bool {
        matches!(self.tail, Tail::Dotted(_))
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_nil() && matches!(self.tail, Tail::Nil)
    }

    /// The heads along the chain, followed by the improper end if
    /// there is one.
    pub fn to_vec(&self) -> Vec<Value> {
        let mut out = vec![self.head.clone()];
        let mut tail = &self.tail;
        loop {
            match tail {
                Tail::Nil => break,
                Tail::Pair(p) => {
                    out.push(p.head.clone());
                    tail = &p.tail;
                }
                Tail::Dotted(v) => {
                    out.push(v.clone());
                    break
                }
            }
        }
        out
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        write!(f, "({}", self.head)?;
        let mut tail = &self.tail;
        loop {
            match tail {
                Tail::Nil => break,
                Tail::Pair(p) => {
                    write!(f, " {}", p.head)?;
                    tail = &p.tail;
                }
                Tail::Dotted(v) => {
                    write!(f, " . {}", v)?;
                    break
                }
            }
        }
        f.write_str(")")
    }
}

/// A proper list of pairs. Lists made with `prepend` share the tail
/// of the list they were made from; the length is computed once.
#[derive(Debug, Clone, Default)]
pub struct List {
    first: Option<Rc<Pair>>,
    len: OnceCell<usize>,
}

pub struct Iter<'l> {
    next: Option<&'l Pair>,
}

impl<'l> Iterator for Iter<'l> {
    type Item = &'l Value;

    fn next(&mut self) -> Option<&'l Value> {
        let pair = self.next?;
        self.next = match &pair.tail {
            Tail::Pair(p) => Some(&**p),
            _ => None
        };
        Some(&pair.head)
    }
}

impl List {
    pub fn new() -> List {
        List::default()
    }

    fn from_first(first: Option<Rc<Pair>>) -> List {
        List { first, len: OnceCell::new() }
    }

    /// A new list with `v` in front of the elements of this one.
    pub fn prepend(&self, v: Value) -> List {
        let tail = match &self.first {
            Some(p) => Tail::Pair(p.clone()),
            None => Tail::Nil
        };
        let list = List::from_first(Some(Rc::new(Pair::new(v, tail))));
        if let Some(n) = self.len.get() {
            let _ = list.len.set(n + 1);
        }
        list
    }

    pub fn first(&self) -> Option<&Value> {
        self.first.as_ref().map(|p| &p.head)
    }

    /// All but the first element; `None` for the empty list.
    pub fn rest(&self) -> Option<List> {
        let p = self.first.as_ref()?;
        Some(match &p.tail {
            Tail::Pair(next) => List::from_first(Some(next.clone())),
            _ => List::new()
        })
    }

    pub fn get(&self, i: usize) -> Option<&Value> {
        self.iter().nth(i)
    }

    pub fn len(&self) -> usize {
        *self.len.get_or_init(|| self.iter().count())
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self.first.as_deref() }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    pub fn concat(&self, other: &List) -> List {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Elements of either list, without duplicates, in order of
    /// first appearance.
    pub fn union(&self, other: &List) -> List {
        let mut out: Vec<Value> = Vec::new();
        for v in self.iter().chain(other.iter()) {
            if !out.contains(v) {
                out.push(v.clone());
            }
        }
        out.into()
    }

    /// Elements of this list that are also in `other`, without
    /// duplicates.
    pub fn intersection(&self, other: &List) -> List {
        let mut out: Vec<Value> = Vec::new();
        for v in self.iter() {
            if other.iter().any(|w| w == v) && !out.contains(v) {
                out.push(v.clone());
            }
        }
        out.into()
    }

    /// Elements of this list that are not in `other`.
    pub fn difference(&self, other: &List) -> List {
        self.iter()
            .filter(|v| !other.iter().any(|w| w == *v))
            .cloned()
            .collect()
    }
}

// Unlink iteratively, dropping a long chain recursively would
// overflow the stack.
impl Drop for List {
    fn drop(&mut self) {
        let mut next = self.first.take();
        while let Some(rc) = next {
            next = match Rc::try_unwrap(rc) {
                Ok(mut pair) => match std::mem::replace(&mut pair.tail, Tail::Nil) {
                    Tail::Pair(p) => Some(p),
                    _ => None
                },
                Err(_) => None
            };
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &List) -> bool {
        self.iter().eq(other.iter())
    }
}

impl std::fmt::Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match &self.first {
            Some(p) => write!(f, "{}", p),
            None => f.write_str("()")
        }
    }
}

impl From<Vec<Value>> for List {
    fn from(v: Vec<Value>) -> List {
        let len = v.len();
        let mut tail = Tail::Nil;
        for x in v.into_iter().rev() {
            tail = Tail::Pair(Rc::new(Pair::new(x, tail)));
        }
        let list = List::from_first(match tail {
            Tail::Pair(p) => Some(p),
            _ => None
        });
        let _ = list.len.set(len);
        list
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> List {
        iter.into_iter().collect::<Vec<Value>>().into()
    }
}

impl From<&List> for Value {
    fn from(l: &List) -> Value {
        Value::List(l.to_vec())
    }
}

impl List {
    /// The list for a `Value::List`.
    pub fn from_value(v: &Value) -> Option<List> {
        v.as_list().map(|items| items.to_vec().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{integer, symbol};

    fn ints(ns: &[i32]) -> List {
        ns.iter().map(|n| integer(*n)).collect()
    }

    #[test]
    fn pairs() {
        let p = Pair::new(symbol("a"), Tail::Dotted(symbol("b")));
        assert!(p.is_dotted());
        assert_eq!(p.to_string(), "(a . b)");
        assert_eq!(p.to_vec(), vec![symbol("a"), symbol("b")]);
        let q = Pair::new(integer(1), Tail::Pair(Rc::new(p)));
        assert!(q.is_proper());
        assert_eq!(q.to_string(), "(1 a . b)");
        assert!(Pair::new(Value::nil(), Tail::Nil).is_empty());
        assert!(!q.is_empty());
    }

    #[test]
    fn access() {
        let l = ints(&[1, 2, 3]);
        assert_eq!(l.len(), 3);
        assert_eq!(l.first(), Some(&integer(1)));
        assert_eq!(l.get(2), Some(&integer(3)));
        assert_eq!(l.get(3), None);
        let rest = l.rest().unwrap();
        assert_eq!(rest, ints(&[2, 3]));
        assert_eq!(rest.len(), 2);
        assert_eq!(List::new().rest(), None);
        assert_eq!(l.to_string(), "(1 2 3)");
        assert_eq!(List::new().to_string(), "()");
    }

    #[test]
    fn prepend_shares_the_tail() {
        let l = ints(&[2, 3]);
        let m = l.prepend(integer(1));
        assert_eq!(m, ints(&[1, 2, 3]));
        assert_eq!(m.len(), 3);
        assert_eq!(l.len(), 2);
        let tail = m.rest().unwrap();
        assert!(Rc::ptr_eq(tail.first.as_ref().unwrap(), l.first.as_ref().unwrap()));
    }

    #[test]
    fn set_operations() {
        let a = ints(&[1, 2, 2, 3]);
        let b = ints(&[3, 4, 2]);
        assert_eq!(a.concat(&b), ints(&[1, 2, 2, 3, 3, 4, 2]));
        assert_eq!(a.union(&b), ints(&[1, 2, 3, 4]));
        assert_eq!(a.intersection(&b), ints(&[2, 3]));
        assert_eq!(a.difference(&b), ints(&[1]));
    }

    #[test]
    fn value_conversion() {
        let v = Value::List(vec![integer(1), symbol("x")]);
        let l = List::from_value(&v).unwrap();
        assert_eq!(Value::from(&l), v);
        assert_eq!(List::from_value(&integer(1)), None);
    }

    #[test]
    fn long_lists_drop() {
        let l: List = (0..200_000).map(integer).collect();
        assert_eq!(l.len(), 200_000);
    }
}
