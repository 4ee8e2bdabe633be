/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::errors::AssemblyError;
use std::collections::HashMap;

// RAM address handed to the first unbound A-instruction symbol.
const VAR_BASE: u16 = 16;

const PREDEFINED: [(&str, u16); 7] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

// The symbol table stores predefined symbols, label bindings and RAM
// variable bindings in one namespace.
#[derive(Debug)]
pub struct SymbolTable {
    bindings: HashMap<String, u16>,
    next_var: u16,
}

impl SymbolTable {
    pub fn with_predefined() -> Self {
        let mut bindings: HashMap<String, u16> = PREDEFINED
            .iter()
            .map(|(name, addr)| (name.to_string(), *addr))
            .collect();

        for i in 0..16u16 {
            bindings.insert(format!("R{i}"), i);
        }

        SymbolTable {
            bindings,
            next_var: VAR_BASE,
        }
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.bindings.get(name).copied()
    }

    /// Binds a label to a ROM address. Rebinding a name to the same address
    /// is a no-op; a different address is an error.
    pub fn bind_label(&mut self, name: &str, addr: u16, line: usize) -> Result<(), AssemblyError> {
        match self.bindings.get(name) {
            Some(existing) if *existing != addr => Err(AssemblyError::LabelRedefined {
                line,
                name: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.bindings.insert(name.to_string(), addr);
                Ok(())
            }
        }
    }

    /// Resolves an A-instruction symbol, allocating the next RAM variable
    /// slot on first occurrence. Labels and predefined symbols are already
    /// present by the time pass 2 runs, so they are never shadowed.
    pub fn resolve_or_allocate(&mut self, name: &str) -> u16 {
        if let Some(addr) = self.get(name) {
            return addr;
        }

        let addr = self.next_var;
        self.bindings.insert(name.to_string(), addr);
        self.next_var += 1;
        addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_seeded() {
        let table = SymbolTable::with_predefined();
        assert_eq!(table.get("SP"), Some(0));
        assert_eq!(table.get("THAT"), Some(4));
        assert_eq!(table.get("R0"), Some(0));
        assert_eq!(table.get("R15"), Some(15));
        assert_eq!(table.get("SCREEN"), Some(16384));
        assert_eq!(table.get("KBD"), Some(24576));
    }

    #[test]
    fn test_variables_allocate_densely_from_16() {
        let mut table = SymbolTable::with_predefined();
        assert_eq!(table.resolve_or_allocate("i"), 16);
        assert_eq!(table.resolve_or_allocate("sum"), 17);
        assert_eq!(table.resolve_or_allocate("i"), 16);
        assert_eq!(table.resolve_or_allocate("j"), 18);
    }

    #[test]
    fn test_label_rebind_same_address_is_noop() {
        let mut table = SymbolTable::with_predefined();
        table.bind_label("LOOP", 7, 1).unwrap();
        table.bind_label("LOOP", 7, 3).unwrap();
        assert_eq!(table.get("LOOP"), Some(7));
    }

    #[test]
    fn test_label_rebind_different_address_fails() {
        let mut table = SymbolTable::with_predefined();
        table.bind_label("LOOP", 7, 1).unwrap();
        let result = table.bind_label("LOOP", 9, 4);
        assert_eq!(
            result,
            Err(AssemblyError::LabelRedefined {
                line: 4,
                name: "LOOP".to_string()
            })
        );
    }
}
