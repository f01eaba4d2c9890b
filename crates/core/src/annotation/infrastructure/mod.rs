pub mod cpu_box_painter;
