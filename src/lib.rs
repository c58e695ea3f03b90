#[macro_use]
extern crate lazy_static;

pub mod vm_translator;

/*
Memory map assumed by the generated code
        0       SP      next free stack cell
        1       LCL     base of the current function's locals
        2       ARG     base of the current function's arguments
        3       THIS    this segment base   (pointer 0)
        4       THAT    that segment base   (pointer 1)
        6-13            temp 1..8           (default temp base 5)
        16+             aux0..aux3 and statics <unit>.<n>, bound by the assembler
        256+            stack
*/
