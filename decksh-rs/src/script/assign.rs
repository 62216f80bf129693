//! Assignments.
//!
//! The form of an assignment is chosen by its token count:
//!
//! | Tokens | Form |
//! |--------|------|
//! | 3 | `id = value` |
//! | 5 | `id = random min max` or `id = a op b` (`op` one of `+ - * /`) |
//! | 7 | `id = polarx cx cy r theta` / `id = polary cx cy r theta` |
//! | 8 | `id = vmap data min1 max1 min2 max2` |
//!
//! plus the compound forms `id += n`, `id -= n`, `id *= n`, `id /= n`
//! (which scan as four tokens: `id`, `+`, `=`, `n`).
//!
//! A failed assignment never touches the target.

use rand::Rng;

use crate::error::{ErrorKind, Fault};
use crate::geometry::{polar, radians, vmap};
use crate::number::{format_number, parse_number};
use crate::var::VarStore;

use super::scan::Record;

/// `id = …` of any length.
pub fn is_assignment(rec: &Record) -> bool {
    rec.len() > 1 && rec.arg(1) == "="
}

/// `id op= n`.
pub fn is_compound(rec: &Record) -> bool {
    rec.len() >= 4 && matches!(rec.arg(1), "+" | "-" | "*" | "/") && rec.arg(2) == "="
}

/// Resolve `token` and parse it as a number.
fn operand(vars: &VarStore, token: &str) -> Result<f64, Fault> {
    parse_number(vars.resolve(token)).ok_or_else(|| Fault::not_a_number(token))
}

fn divide_by_zero(lhs: f64, rhs: f64) -> Fault {
    Fault::new(
        ErrorKind::Arithmetic,
        format!("you cannot divide by zero ({} / {})", format_number(lhs), format_number(rhs)),
    )
}

/// Apply `op` to two numbers.  `None` for an unknown operator.
fn apply(op: &str, lhs: f64, rhs: f64) -> Option<Result<f64, Fault>> {
    Some(Ok(match op {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" => {
            if rhs == 0.0 {
                return Some(Err(divide_by_zero(lhs, rhs)));
            }
            lhs / rhs
        }
        _ => return None,
    }))
}

/// Carry out an `id = …` assignment.
pub fn assign(rec: &Record, vars: &mut VarStore, rng: &mut impl Rng) -> Result<(), Fault> {
    match rec.len() {
        3 => {
            vars.set(rec.keyword(), rec.arg(2));
            Ok(())
        }
        5 if rec.arg(2) == "random" => random(rec, vars, rng),
        5 => binop(rec, vars),
        7 => polar_assign(rec, vars),
        8 => vmap_assign(rec, vars),
        _ => Err(Fault::usage(format!("illegal assignment: {}", rec.tokens.join(" ")))),
    }
}

/// `id = a op b`
fn binop(rec: &Record, vars: &mut VarStore) -> Result<(), Fault> {
    let usage = || Fault::usage("id = operand op operand");
    let lhs = operand(vars, rec.arg(2))?;
    let rhs = operand(vars, rec.arg(4))?;
    let value = apply(rec.arg(3), lhs, rhs).ok_or_else(usage)??;
    vars.set(rec.keyword(), format_number(value));
    Ok(())
}

/// `id = random min max`
fn random(rec: &Record, vars: &mut VarStore, rng: &mut impl Rng) -> Result<(), Fault> {
    let min = operand(vars, rec.arg(3))?;
    let max = operand(vars, rec.arg(4))?;
    let draw: f64 = rng.gen();
    vars.set(rec.keyword(), format_number(vmap(draw, 0.0, 1.0, min, max)));
    Ok(())
}

/// `id = polarx|polary cx cy r theta`
fn polar_assign(rec: &Record, vars: &mut VarStore) -> Result<(), Fault> {
    let which = rec.arg(2);
    if which != "polarx" && which != "polary" {
        return Err(Fault::usage("use: x = polar[x|y] cx cy r theta"));
    }
    let cx = operand(vars, rec.arg(3))?;
    let cy = operand(vars, rec.arg(4))?;
    let r = operand(vars, rec.arg(5))?;
    let theta = operand(vars, rec.arg(6))?;
    let p = polar(cx, cy, r, radians(theta));
    let value = if which == "polarx" { p.x } else { p.y };
    vars.set(rec.keyword(), format_number(value));
    Ok(())
}

/// `id = vmap data min1 max1 min2 max2`
fn vmap_assign(rec: &Record, vars: &mut VarStore) -> Result<(), Fault> {
    if rec.arg(2) != "vmap" {
        return Err(Fault::usage("use: v = vmap data min1 max1 min2 max2"));
    }
    let mut args = [0.0; 5];
    for (slot, token) in args.iter_mut().zip(rec.rest(3)) {
        *slot = operand(vars, token)?;
    }
    let [data, min1, max1, min2, max2] = args;
    vars.set(rec.keyword(), format_number(vmap(data, min1, max1, min2, max2)));
    Ok(())
}

/// Carry out an `id op= n` assignment.  The operand is taken literally.
pub fn assign_op(rec: &Record, vars: &mut VarStore) -> Result<(), Fault> {
    let target = rec.keyword();
    let current = operand(vars, target)?;
    let rhs = parse_number(rec.arg(3)).ok_or_else(|| Fault::not_a_number(rec.arg(3)))?;
    let value = apply(rec.arg(1), current, rhs)
        .ok_or_else(|| Fault::usage("id += number, id -= number, id *= number or id /= number"))??;
    vars.set(target, format_number(value));
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::script::scan::parse_line;

    fn run(vars: &mut VarStore, line: &str) -> Result<(), Fault> {
        let rec = parse_line(1, line, vars);
        let mut rng = StdRng::seed_from_u64(1);
        if is_assignment(&rec) {
            assign(&rec, vars, &mut rng)
        } else {
            assign_op(&rec, vars)
        }
    }

    fn kind(r: Result<(), Fault>) -> Option<ErrorKind> {
        match r {
            Err(Fault::Directive { kind, .. }) => Some(kind),
            _ => None,
        }
    }

    #[test]
    fn simple_assignment_keeps_text() {
        let mut vars = VarStore::new();
        run(&mut vars, "x = 10.50").unwrap();
        assert_eq!(vars.get("x"), Some("10.50"));
        run(&mut vars, "c = \"red\"").unwrap();
        assert_eq!(vars.get("c"), Some("\"red\""));
    }

    #[test]
    fn binary_ops() {
        let mut vars = VarStore::new();
        run(&mut vars, "a = 6").unwrap();
        run(&mut vars, "b = a * 7").unwrap();
        assert_eq!(vars.get("b"), Some("42"));
        run(&mut vars, "c = b / 4").unwrap();
        assert_eq!(vars.get("c"), Some("10.5"));
        run(&mut vars, "d = a - 10").unwrap();
        assert_eq!(vars.get("d"), Some("-4"));
    }

    #[test]
    fn binary_op_rejects_non_numbers() {
        let mut vars = VarStore::new();
        assert_eq!(kind(run(&mut vars, "x = foo + 1")), Some(ErrorKind::Number));
        assert!(!vars.contains("x"));
    }

    #[test]
    fn unknown_operator_is_usage() {
        let mut vars = VarStore::new();
        assert_eq!(kind(run(&mut vars, "x = 1 % 2")), Some(ErrorKind::Usage));
    }

    #[test]
    fn divide_by_zero_keeps_target() {
        let mut vars = VarStore::new();
        run(&mut vars, "x = 5").unwrap();
        assert_eq!(kind(run(&mut vars, "x = 1 / 0")), Some(ErrorKind::Arithmetic));
        assert_eq!(kind(run(&mut vars, "x /= 0")), Some(ErrorKind::Arithmetic));
        assert_eq!(vars.get("x"), Some("5"));
    }

    #[test]
    fn compound_ops() {
        let mut vars = VarStore::new();
        run(&mut vars, "y = 10").unwrap();
        run(&mut vars, "y += 2.5").unwrap();
        assert_eq!(vars.get("y"), Some("12.5"));
        run(&mut vars, "y -= 0.5").unwrap();
        run(&mut vars, "y *= 3").unwrap();
        run(&mut vars, "y /= 4").unwrap();
        assert_eq!(vars.get("y"), Some("9"));
    }

    #[test]
    fn compound_on_unset_is_number_error() {
        let mut vars = VarStore::new();
        assert_eq!(kind(run(&mut vars, "z += 1")), Some(ErrorKind::Number));
    }

    #[test]
    fn repeated_increment_has_no_drift() {
        let mut vars = VarStore::new();
        run(&mut vars, "v = 0").unwrap();
        for _ in 0..10 {
            run(&mut vars, "v += 0.5").unwrap();
        }
        assert_eq!(vars.get("v"), Some("5"));
    }

    #[test]
    fn polar_functions() {
        let mut vars = VarStore::new();
        run(&mut vars, "px = polarx 50 50 10 0").unwrap();
        run(&mut vars, "py = polary 50 50 10 0").unwrap();
        assert_eq!(vars.get("px"), Some("60"));
        assert_eq!(vars.get("py"), Some("50"));
        assert_eq!(kind(run(&mut vars, "q = polarz 50 50 10 0")), Some(ErrorKind::Usage));
    }

    #[test]
    fn vmap_function() {
        let mut vars = VarStore::new();
        run(&mut vars, "v = vmap 5 0 10 0 100").unwrap();
        assert_eq!(vars.get("v"), Some("50"));
        assert_eq!(kind(run(&mut vars, "v = vmop 5 0 10 0 100")), Some(ErrorKind::Usage));
    }

    #[test]
    fn random_is_in_range() {
        let mut vars = VarStore::new();
        for _ in 0..20 {
            run(&mut vars, "r = random 10 20").unwrap();
            let v: f64 = vars.get("r").unwrap().parse().unwrap();
            assert!((10.0..20.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn illegal_shapes() {
        let mut vars = VarStore::new();
        assert_eq!(kind(run(&mut vars, "x = 1 2")), Some(ErrorKind::Usage));
        assert_eq!(kind(run(&mut vars, "x =")), Some(ErrorKind::Usage));
    }

    #[test]
    fn shape_predicates() {
        let vars = VarStore::new();
        assert!(is_assignment(&parse_line(1, "x = 1", &vars)));
        assert!(is_compound(&parse_line(1, "x += 1", &vars)));
        assert!(!is_compound(&parse_line(1, "x + 1", &vars)));
        assert!(!is_assignment(&parse_line(1, "circle 1 2 3", &vars)));
    }
}
