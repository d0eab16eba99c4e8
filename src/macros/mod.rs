//! Console print macros, shared by every module that touches the UART
//! console.

mod print;
