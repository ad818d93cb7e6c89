use std::io::{self, Write};

use crate::ast::{BinaryOp, Expr};
use crate::symtab::Slot;
use crate::types::Type;

/// Renders IR instructions as fixed-format text, one line per call. The
/// emitter holds no compilation state of its own; destinations are minted by
/// the caller so that every computed value lands in a fresh temporary.
pub struct Emitter<W> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn unit_begin(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "Unit: {name}")
    }

    pub fn func_begin(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "FuncBegin: {name}")
    }

    pub fn func_end(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "FuncEnd: {name}")
    }

    pub fn declare(&mut self, name: &str, slot: Slot, ty: Type) -> io::Result<()> {
        writeln!(self.out, "Declare: {name}, {slot}, {ty}")
    }

    pub fn assign(&mut self, dest: Slot, src: &Expr) -> io::Result<()> {
        writeln!(self.out, "Assign: {dest}, {src}")
    }

    pub fn infix(&mut self, op: BinaryOp, dest: Slot, lhs: &Expr, rhs: &Expr) -> io::Result<()> {
        writeln!(self.out, "{op}: {dest}, {lhs}, {rhs}")
    }

    /// Widening Int -> Long is traced as `Promote`, every other conversion
    /// as `Convert`. The distinction is informational only.
    pub fn convert(&mut self, dest: Slot, src: &Expr, target: Type) -> io::Result<()> {
        let op = if src.ty == Type::Int && target == Type::Long {
            "Promote"
        } else {
            "Convert"
        };

        writeln!(self.out, "{op}: {dest}, {src}, {target}")
    }

    pub fn read(&mut self, slot: Slot) -> io::Result<()> {
        writeln!(self.out, "Read: {slot}")
    }

    pub fn write(&mut self, src: &Expr) -> io::Result<()> {
        writeln!(self.out, "Write: {src}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::symtab::SymbolTable;

    fn emit(f: impl FnOnce(&mut Emitter<&mut Vec<u8>>) -> io::Result<()>) -> String {
        let mut buf = vec![];
        let mut emitter = Emitter::new(&mut buf);
        f(&mut emitter).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn instruction_formats() {
        let mut table = SymbolTable::new();
        let t0 = table.alloc_slot();
        let t1 = table.alloc_slot();

        let lhs = ExprKind::Var(t0).typed(Type::Int);
        let rhs = ExprKind::IntLit(7).typed(Type::Int);

        assert_eq!(emit(|e| e.unit_begin("demo")), "Unit: demo\n");
        assert_eq!(emit(|e| e.func_begin("main")), "FuncBegin: main\n");
        assert_eq!(emit(|e| e.func_end("main")), "FuncEnd: main\n");
        assert_eq!(
            emit(|e| e.declare("a", t0, Type::Int)),
            "Declare: a, t0, int\n"
        );
        assert_eq!(emit(|e| e.assign(t0, &rhs)), "Assign: t0, 7\n");
        assert_eq!(
            emit(|e| e.infix(BinaryOp::Add, t1, &lhs, &rhs)),
            "Add: t1, t0, 7\n"
        );
        assert_eq!(emit(|e| e.read(t0)), "Read: t0\n");
        assert_eq!(emit(|e| e.write(&lhs)), "Write: t0\n");
    }

    #[test]
    fn promote_vs_convert() {
        let mut table = SymbolTable::new();
        let dest = table.alloc_slot();

        let int_src = ExprKind::IntLit(2).typed(Type::Int);
        let long_src = ExprKind::LongLit(2).typed(Type::Long);

        assert_eq!(
            emit(|e| e.convert(dest, &int_src, Type::Long)),
            "Promote: t0, 2, long\n"
        );
        assert_eq!(
            emit(|e| e.convert(dest, &int_src, Type::Float)),
            "Convert: t0, 2, float\n"
        );
        assert_eq!(
            emit(|e| e.convert(dest, &long_src, Type::Float)),
            "Convert: t0, 2, float\n"
        );
    }
}
